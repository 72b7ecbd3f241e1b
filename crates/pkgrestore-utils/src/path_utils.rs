use std::path::Path;

/// Resolver output lays packages out as `.../<name>/<version>/`; recover both parts.
#[must_use]
pub fn package_identity_from_root(package_root: &Path) -> Option<(String, String)> {
    let version = package_root.file_name()?.to_str()?;
    let name = package_root.parent()?.file_name()?.to_str()?;

    if name.is_empty() || version.is_empty() {
        return None;
    }
    Some((name.to_string(), version.to_string()))
}

/// True when the file's containing directory is the root itself or nested below it.
#[must_use]
pub fn is_within_root(file: &Path, package_root: &Path) -> bool {
    file.parent()
        .is_some_and(|dir| dir.starts_with(package_root))
}

/// Extension check, case insensitive, without the leading dot.
#[must_use]
pub fn has_extension(file: &Path, extensions: &[&str]) -> bool {
    file.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}
