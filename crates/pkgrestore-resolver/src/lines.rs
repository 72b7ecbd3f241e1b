use pkgrestore_constants::{INCLUDE_LINE, RESTORE_SOURCES_LINE, VERSION_FIELD};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeLine {
    pub name: String,
    pub version: Option<String>,
}

/// One line of the package-manager text protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageManagerLine {
    RestoreSource(String),
    Include(IncludeLine),
}

/// Sources first, then references in the order given.
pub fn package_manager_lines<'a, S, R>(sources: S, references: R) -> Vec<String>
where
    S: IntoIterator<Item = &'a str>,
    R: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut lines: Vec<String> = sources
        .into_iter()
        .map(|source| format!("{RESTORE_SOURCES_LINE}{source}"))
        .collect();

    lines.extend(references.into_iter().map(|(name, version)| {
        format!(
            "{INCLUDE_LINE}{name}, {VERSION_FIELD}{}",
            version.unwrap_or_default()
        )
    }));

    lines
}

#[must_use]
pub fn parse_line(line: &str) -> Option<PackageManagerLine> {
    let line = line.trim();

    if let Some(source) = line.strip_prefix(RESTORE_SOURCES_LINE) {
        let source = source.trim();
        return (!source.is_empty()).then(|| PackageManagerLine::RestoreSource(source.to_string()));
    }

    let rest = line.strip_prefix(INCLUDE_LINE)?;
    let (name, version) = match rest.split_once(',') {
        Some((name, field)) => {
            let version = field.trim().strip_prefix(VERSION_FIELD)?.trim();
            (name.trim(), (!version.is_empty()).then(|| version.to_string()))
        }
        None => (rest.trim(), None),
    };

    if name.is_empty() {
        return None;
    }

    Some(PackageManagerLine::Include(IncludeLine {
        name: name.to_string(),
        version,
    }))
}
