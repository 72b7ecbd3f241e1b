use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use pkgrestore_constants::SOURCE_PREFIX;
use pkgrestore_utils::{is_unconstrained, reference_key};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageReference {
    pub name: String,
    pub version: Option<String>,
}

impl PackageReference {
    /// Surrounding whitespace in the name is dropped so the stored name and
    /// its key agree.
    #[must_use]
    pub fn new(name: &str, version: Option<&str>) -> Self {
        Self {
            name: name.trim().to_string(),
            version: version.map(str::to_string),
        }
    }

    #[must_use]
    pub fn key(&self) -> String {
        reference_key(&self.name)
    }

    /// The version, or `None` when the request accepts any version.
    #[must_use]
    pub fn constrained_version(&self) -> Option<&str> {
        let version = self.version.as_deref();
        if is_unconstrained(version) {
            None
        } else {
            version.map(str::trim)
        }
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.constrained_version() {
            Some(version) => write!(f, "{SOURCE_PREFIX}{}, {version}", self.name),
            None => write!(f, "{SOURCE_PREFIX}{}", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPackageReference {
    pub name: String,
    pub version: String,
    pub assembly_paths: Vec<PathBuf>,
    pub package_root: PathBuf,
    pub probing_paths: Vec<PathBuf>,
}

impl ResolvedPackageReference {
    #[must_use]
    pub fn key(&self) -> String {
        reference_key(&self.name)
    }
}

impl fmt::Display for ResolvedPackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SOURCE_PREFIX}{}, {}", self.name, self.version)
    }
}

/// What a lookup hands back: the pending request, or the entry that already shadows it.
#[derive(Debug, Clone)]
pub enum Reference {
    Requested(Arc<PackageReference>),
    Resolved(Arc<ResolvedPackageReference>),
}

impl Reference {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Requested(r) => &r.name,
            Self::Resolved(r) => &r.name,
        }
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Requested(r) => r.constrained_version(),
            Self::Resolved(r) => Some(r.version.as_str()),
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Same underlying entry, not merely equal contents.
    #[must_use]
    pub fn same_entry(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Requested(a), Self::Requested(b)) => Arc::ptr_eq(a, b),
            (Self::Resolved(a), Self::Resolved(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
