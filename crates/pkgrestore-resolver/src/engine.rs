use std::path::PathBuf;

use crate::reporter::ErrorReporter;
use pkgrestore_error::Result;

/// Everything the engine needs for one resolve call.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub source_descriptor: String,
    pub batch_id: String,
    pub script_extension: String,
    pub target_framework: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Resolved {
        resolutions: Vec<PathBuf>,
        source_files: Vec<PathBuf>,
        roots: Vec<PathBuf>,
    },
    Failed {
        stdout: Vec<String>,
    },
}

/// The external dependency manager. `resolve` blocks for as long as the
/// underlying engine needs; callers are expected to run it off their own
/// scheduling thread.
pub trait DependencyEngine: Send + Sync {
    fn resolve(&self, request: &ResolveRequest, reporter: &dyn ErrorReporter) -> ResolveOutcome;

    /// Releases engine resources. Only called when the engine was actually created.
    fn dispose(&self) -> Result<()> {
        Ok(())
    }
}
