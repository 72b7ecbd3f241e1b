use std::path::{Path, PathBuf};

use pkgrestore_utils::reference_key;

/// Store layout: `<store>/<lower-cased name>/<version>/`.
pub struct PathResolver;

impl PathResolver {
    #[must_use]
    pub fn get_package_path(store_base: &Path, package_name: &str, version: &str) -> PathBuf {
        Self::get_package_base_path(store_base, package_name).join(version.trim())
    }

    #[must_use]
    pub fn get_package_base_path(store_base: &Path, package_name: &str) -> PathBuf {
        store_base.join(Self::sanitize_package_name(package_name))
    }

    #[must_use]
    pub fn sanitize_package_name(package_name: &str) -> String {
        reference_key(package_name).replace(['/', '\\'], "_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_path_is_lower_cased() {
        let path = PathResolver::get_package_path(Path::new("/store"), "FSharp.Data", "3.3.3");
        assert_eq!(path, PathBuf::from("/store/fsharp.data/3.3.3"));
    }

    #[test]
    fn test_separators_are_sanitized() {
        assert_eq!(PathResolver::sanitize_package_name("evil/../Name"), "evil_.._name");
    }
}
