use std::path::{Path, PathBuf};

use crate::reference::ResolvedPackageReference;
use crate::stores::RequestStore;
use pkgrestore_error::{RestoreError, Result};
use pkgrestore_utils::{is_within_root, package_identity_from_root};

/// Turns raw resolver output into resolved references, one per package root.
pub struct ReferenceBuilder<'a> {
    requested: &'a RequestStore,
    debug: bool,
}

impl<'a> ReferenceBuilder<'a> {
    #[must_use]
    pub const fn new(requested: &'a RequestStore, debug: bool) -> Self {
        Self { requested, debug }
    }

    /// Output follows the order of `roots`. Roots whose identity cannot be
    /// derived are skipped without affecting the others.
    #[must_use]
    pub fn build(&self, resolutions: &[PathBuf], roots: &[PathBuf]) -> Vec<ResolvedPackageReference> {
        roots
            .iter()
            .filter_map(|root| match self.identity(root) {
                Ok((name, version)) => Some(ResolvedPackageReference {
                    name,
                    version,
                    assembly_paths: Self::assembly_paths_for(root, resolutions),
                    package_root: root.clone(),
                    probing_paths: Self::probing_paths_for(root),
                }),
                Err(e) => {
                    pkgrestore_logger::debug(&format!("Skipping package root: {e}"), self.debug);
                    None
                }
            })
            .collect()
    }

    /// `(name, version)` from `.../<name>/<version>/`, with the name swapped for
    /// the casing the user originally asked for when there is a matching request.
    fn identity(&self, root: &Path) -> Result<(String, String)> {
        let (name, version) = package_identity_from_root(root)
            .ok_or_else(|| RestoreError::MalformedPackageRoot(root.display().to_string()))?;

        let name = self
            .requested
            .get(&name)
            .map_or(name, |requested| requested.name.clone());

        Ok((name, version))
    }

    fn assembly_paths_for(root: &Path, resolutions: &[PathBuf]) -> Vec<PathBuf> {
        resolutions
            .iter()
            .filter(|file| is_within_root(file, root))
            .cloned()
            .collect()
    }

    fn probing_paths_for(root: &Path) -> Vec<PathBuf> {
        vec![root.to_path_buf()]
    }
}
