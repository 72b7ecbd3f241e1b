/// Package names are case insensitive; this is the identity used by every store.
#[must_use]
pub fn reference_key(package_name: &str) -> String {
    package_name.trim().to_lowercase()
}

/// `None`, blank and `*` all mean "any version".
#[must_use]
pub fn is_unconstrained(version: Option<&str>) -> bool {
    match version {
        None => true,
        Some(v) => {
            let v = v.trim();
            v.is_empty() || v == "*"
        }
    }
}

/// Canonical form used when comparing two requested versions.
#[must_use]
pub fn normalize_version(version: Option<&str>) -> String {
    if is_unconstrained(version) {
        String::new()
    } else {
        version.unwrap_or_default().trim().to_lowercase()
    }
}

/// Whether a new request for `requested` may reuse an entry already resolved at `resolved`.
#[must_use]
pub fn matches_resolved_version(resolved: &str, requested: Option<&str>) -> bool {
    is_unconstrained(requested) || normalize_version(Some(resolved)) == normalize_version(requested)
}

/// Whether two pending requests ask for the same thing. Unlike the resolved case,
/// an unconstrained request does not match a pinned one.
#[must_use]
pub fn matches_pending_version(pending: Option<&str>, requested: Option<&str>) -> bool {
    normalize_version(pending) == normalize_version(requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_key_ignores_case() {
        assert_eq!(reference_key("FSharp.Data"), "fsharp.data");
        assert_eq!(reference_key(" Foo "), reference_key("foo"));
    }

    #[test]
    fn test_unconstrained_forms() {
        assert!(is_unconstrained(None));
        assert!(is_unconstrained(Some("")));
        assert!(is_unconstrained(Some("  ")));
        assert!(is_unconstrained(Some("*")));
        assert!(!is_unconstrained(Some("1.0.0")));
    }

    #[test]
    fn test_resolved_version_matching() {
        assert!(matches_resolved_version("1.0.0", None));
        assert!(matches_resolved_version("1.0.0", Some("*")));
        assert!(matches_resolved_version("1.0.0-Beta", Some(" 1.0.0-beta ")));
        assert!(!matches_resolved_version("1.0.0", Some("2.0.0")));
    }

    #[test]
    fn test_pending_version_matching() {
        assert!(matches_pending_version(None, Some("")));
        assert!(matches_pending_version(Some("*"), None));
        assert!(matches_pending_version(Some("1.0"), Some("1.0 ")));
        assert!(!matches_pending_version(None, Some("2.0.0")));
        assert!(!matches_pending_version(Some("1.0"), None));
    }
}
