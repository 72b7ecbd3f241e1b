use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::engine::{DependencyEngine, ResolveOutcome, ResolveRequest};
use crate::lines::{IncludeLine, PackageManagerLine, parse_line};
use crate::reporter::{ErrorReportType, ErrorReporter};
use crate::version_utils::{highest_version, parse_partial_version};
use pkgrestore_constants::{PACKAGE_NOT_FOUND_CODE, SOURCE_FILE_EXTENSIONS};
use pkgrestore_store::{PathResolver, collect_files, list_versions};
use pkgrestore_utils::{has_extension, is_unconstrained};

/// Resolves references against package stores on disk. `RestoreSources=`
/// lines name extra stores, searched in order before the default one.
pub struct LocalStoreEngine {
    default_store: PathBuf,
}

impl LocalStoreEngine {
    #[must_use]
    pub const fn new(default_store: PathBuf) -> Self {
        Self { default_store }
    }

    fn locate(stores: &[PathBuf], include: &IncludeLine) -> Option<PathBuf> {
        stores
            .iter()
            .find_map(|store| Self::locate_in_store(store, include))
    }

    fn locate_in_store(store: &Path, include: &IncludeLine) -> Option<PathBuf> {
        let versions = list_versions(store, &include.name).ok()?;

        let selected = if is_unconstrained(include.version.as_deref()) {
            highest_version(versions.iter().map(String::as_str))?
        } else {
            let wanted = include.version.as_deref()?.trim();
            let wanted_parsed = parse_partial_version(wanted).ok();
            versions.iter().map(String::as_str).find(|v| {
                v.eq_ignore_ascii_case(wanted)
                    || wanted_parsed
                        .as_ref()
                        .is_some_and(|w| parse_partial_version(v).ok().as_ref() == Some(w))
            })?
        };

        let root = PathResolver::get_package_path(store, &include.name, selected);
        root.is_dir().then_some(root)
    }
}

impl DependencyEngine for LocalStoreEngine {
    fn resolve(&self, request: &ResolveRequest, reporter: &dyn ErrorReporter) -> ResolveOutcome {
        let mut stores = Vec::new();
        let mut includes = Vec::new();

        for line in &request.lines {
            match parse_line(line) {
                Some(PackageManagerLine::RestoreSource(source)) => stores.push(PathBuf::from(source)),
                Some(PackageManagerLine::Include(include)) => includes.push(include),
                None => reporter.report(
                    ErrorReportType::Warning,
                    0,
                    &format!("Ignoring unrecognized package manager line '{line}'"),
                ),
            }
        }
        stores.push(self.default_store.clone());

        let located: Vec<(&IncludeLine, Option<PathBuf>)> = includes
            .par_iter()
            .map(|include| (include, Self::locate(&stores, include)))
            .collect();

        let mut stdout = Vec::new();
        let mut roots = Vec::new();
        for (include, root) in located {
            match root {
                Some(root) => roots.push(root),
                None => {
                    let message = match include.version.as_deref() {
                        Some(v) if !is_unconstrained(Some(v)) => {
                            format!("Unable to find package {} with version {v}", include.name)
                        }
                        _ => format!("Unable to find package {}", include.name),
                    };
                    reporter.report(ErrorReportType::Error, PACKAGE_NOT_FOUND_CODE, &message);
                    stdout.push(message);
                }
            }
        }

        if !stdout.is_empty() {
            return ResolveOutcome::Failed { stdout };
        }

        let mut resolutions = Vec::new();
        for root in &roots {
            match collect_files(root) {
                Ok(files) => resolutions.extend(files),
                Err(e) => {
                    return ResolveOutcome::Failed {
                        stdout: vec![format!("Failed to read {}: {e}", root.display())],
                    };
                }
            }
        }

        let source_files = resolutions
            .iter()
            .filter(|f| has_extension(f, SOURCE_FILE_EXTENSIONS))
            .cloned()
            .collect();

        ResolveOutcome::Resolved {
            resolutions,
            source_files,
            roots,
        }
    }
}
