use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorReportType {
    Error,
    Warning,
}

/// Diagnostic sink handed into the engine's call stack.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, kind: ErrorReportType, code: i32, message: &str);
}

pub struct LoggingReporter;

impl ErrorReporter for LoggingReporter {
    fn report(&self, kind: ErrorReportType, code: i32, message: &str) {
        match kind {
            ErrorReportType::Error => {
                pkgrestore_logger::error(&format!("PackageManagementError {code} {message}"));
            }
            ErrorReportType::Warning => {
                pkgrestore_logger::warn(&format!("PackageManagementWarning {code} {message}"));
            }
        }
    }
}

/// Wraps another reporter so that nothing it does can unwind into the engine.
#[derive(Clone)]
pub struct GuardedReporter {
    inner: Arc<dyn ErrorReporter>,
}

impl GuardedReporter {
    #[must_use]
    pub fn new(inner: Arc<dyn ErrorReporter>) -> Self {
        Self { inner }
    }
}

impl Default for GuardedReporter {
    fn default() -> Self {
        Self::new(Arc::new(LoggingReporter))
    }
}

impl ErrorReporter for GuardedReporter {
    fn report(&self, kind: ErrorReportType, code: i32, message: &str) {
        let inner = &self.inner;
        if catch_unwind(AssertUnwindSafe(|| inner.report(kind, code, message))).is_err() {
            pkgrestore_logger::debug(
                &format!("Error reporter panicked while handling diagnostic {code}"),
                true,
            );
        }
    }
}
