use serde::Serialize;
use std::sync::Arc;

use crate::reference::{PackageReference, ResolvedPackageReference};

/// Outcome of one restore cycle.
#[derive(Debug, Clone, Serialize)]
pub struct RestoreResult {
    pub succeeded: bool,
    pub requested_packages: Vec<Arc<PackageReference>>,
    pub resolved_references: Vec<Arc<ResolvedPackageReference>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<String>,
}

impl RestoreResult {
    #[must_use]
    pub fn success(
        requested_packages: Vec<Arc<PackageReference>>,
        resolved_references: Vec<Arc<ResolvedPackageReference>>,
    ) -> Self {
        Self {
            succeeded: true,
            requested_packages,
            resolved_references,
            errors: None,
        }
    }

    #[must_use]
    pub fn failure(requested_packages: Vec<Arc<PackageReference>>, errors: String) -> Self {
        Self {
            succeeded: false,
            requested_packages,
            resolved_references: Vec::new(),
            errors: Some(errors),
        }
    }
}
