use semver::Version;

/// Parses package versions the way feeds write them: `1`, `1.2`, `1.2.3`,
/// `1.2.3-beta` and four-part `1.2.3.4` (revision kept as build metadata).
pub fn parse_partial_version(version_str: &str) -> Result<Version, String> {
    let cleaned = version_str.trim();

    if let Ok(version) = Version::parse(cleaned) {
        return Ok(version);
    }

    let (numbers, pre) = match cleaned.split_once('-') {
        Some((numbers, pre)) => (numbers, Some(pre)),
        None => (cleaned, None),
    };

    let parts = numbers
        .split('.')
        .map(|p| {
            p.parse::<u64>()
                .map_err(|_| format!("Invalid version component '{p}' in '{cleaned}'"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut version = match parts.as_slice() {
        [major] => Version::new(*major, 0, 0),
        [major, minor] => Version::new(*major, *minor, 0),
        [major, minor, patch] => Version::new(*major, *minor, *patch),
        [major, minor, patch, revision] => {
            let mut v = Version::new(*major, *minor, *patch);
            v.build = semver::BuildMetadata::new(&revision.to_string())
                .map_err(|e| format!("Invalid version '{cleaned}': {e}"))?;
            v
        }
        _ => return Err(format!("Invalid version '{cleaned}'")),
    };

    if let Some(pre) = pre {
        version.pre =
            semver::Prerelease::new(pre).map_err(|e| format!("Invalid version '{cleaned}': {e}"))?;
    }

    Ok(version)
}

/// Highest version among `candidates`; unparseable entries are ignored.
pub fn highest_version<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    candidates
        .into_iter()
        .filter_map(|c| parse_partial_version(c).ok().map(|v| (v, c)))
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, c)| c)
}
