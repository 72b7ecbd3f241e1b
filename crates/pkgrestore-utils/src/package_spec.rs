use pkgrestore_constants::SOURCE_PREFIX;

/// Parses `nuget:Name, Version`, `nuget:Name`, `Name@Version` or a bare `Name`.
/// The version is `None` when the spec leaves it out.
#[must_use]
pub fn parse_pkg_spec(spec: &str) -> Option<(String, Option<String>)> {
    let spec = spec.trim();

    if let Some(rest) = spec.strip_prefix(SOURCE_PREFIX) {
        let (name, version) = match rest.split_once(',') {
            Some((n, v)) => (n.trim(), Some(v.trim())),
            None => (rest.trim(), None),
        };
        return build(name, version);
    }

    match spec.split_once('@') {
        Some((n, v)) => build(n.trim(), Some(v.trim())),
        None => build(spec, None),
    }
}

fn build(name: &str, version: Option<&str>) -> Option<(String, Option<String>)> {
    if name.is_empty() || name.contains(char::is_whitespace) || name.contains(',') {
        return None;
    }
    let version = version.filter(|v| !v.is_empty()).map(str::to_string);
    Some((name.to_string(), version))
}
