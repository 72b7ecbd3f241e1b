pub mod engine;
pub mod lazy;
pub mod lines;
pub mod local;
pub mod reporter;
pub mod version_utils;

pub use engine::{DependencyEngine, ResolveOutcome, ResolveRequest};
pub use lazy::{EngineFactory, LazyEngine};
pub use lines::{IncludeLine, PackageManagerLine, package_manager_lines, parse_line};
pub use local::LocalStoreEngine;
pub use reporter::{ErrorReportType, ErrorReporter, GuardedReporter, LoggingReporter};
