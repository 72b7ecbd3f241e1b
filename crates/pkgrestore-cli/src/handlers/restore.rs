use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::time::Duration;

use crate::observer::TerminalObserver;
use pkgrestore_core::{
    RestoreContext, RestoreObserver, RestoreResult, RestoreSettings, local_context,
    restore_packages,
};
use pkgrestore_store::get_store_path;
use pkgrestore_utils::parse_pkg_spec;

pub struct RestoreHandler;

impl RestoreHandler {
    pub fn handle_restore(
        packages: &[String],
        sources: &[String],
        store: Option<PathBuf>,
        timeout: Option<u64>,
        json: bool,
        debug: bool,
    ) -> Result<()> {
        let parsed = packages
            .iter()
            .map(|spec| {
                parse_pkg_spec(spec)
                    .ok_or_else(|| anyhow::anyhow!("Unable to parse package reference: \"{spec}\""))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut settings = RestoreSettings::default().with_debug(debug);
        if let Some(secs) = timeout {
            settings = settings.with_timeout(Duration::from_secs(secs));
        }

        if !json {
            Self::print_header(packages);
        }

        let store = store.unwrap_or_else(get_store_path);
        let context = local_context(store, settings);
        let observer = TerminalObserver::new(debug);

        let result = Self::run_restore(&context, &observer, sources, &parsed)?;

        if json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else if result.succeeded {
            pkgrestore_logger::finish(&format!(
                "Restored {} package(s)",
                result.resolved_references.len()
            ));
        }

        if !result.succeeded {
            anyhow::bail!("Package restore failed");
        }
        Ok(())
    }

    /// Runs one supervised restore on a dedicated runtime. When it fails, the
    /// runtime is shut down without joining an engine call that is still busy
    /// on the blocking pool, so a timeout is reported as soon as it fires.
    pub fn run_restore(
        context: &RestoreContext,
        observer: &dyn RestoreObserver,
        sources: &[String],
        packages: &[(String, Option<String>)],
    ) -> Result<RestoreResult> {
        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| anyhow::anyhow!("Failed to create async runtime: {e}"))?;
        let outcome = rt.block_on(restore_packages(context, observer, sources, packages));
        if outcome.is_err() {
            rt.shutdown_background();
        }
        outcome
    }

    fn print_header(packages: &[String]) {
        println!(
            "{} {} {}",
            "pkgrestore".bright_cyan().bold(),
            "restore".bright_white(),
            packages.join(" ").bright_white()
        );
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgrestore_resolver::{DependencyEngine, ErrorReporter, ResolveOutcome, ResolveRequest};
    use std::sync::Arc;
    use std::time::Instant;

    struct HangingEngine(Duration);

    impl DependencyEngine for HangingEngine {
        fn resolve(&self, _request: &ResolveRequest, _reporter: &dyn ErrorReporter) -> ResolveOutcome {
            std::thread::sleep(self.0);
            ResolveOutcome::Failed {
                stdout: vec!["too late".to_string()],
            }
        }
    }

    #[test]
    fn test_timeout_returns_without_joining_engine() {
        let engine: Arc<dyn DependencyEngine> = Arc::new(HangingEngine(Duration::from_secs(5)));
        let settings = RestoreSettings::default()
            .with_timeout(Duration::from_millis(100))
            .with_poll_interval(Duration::from_millis(20));
        let context =
            RestoreContext::with_settings(Box::new(move || Ok(Arc::clone(&engine))), settings);
        let packages = vec![("Bar".to_string(), None)];

        let started = Instant::now();
        let err = RestoreHandler::run_restore(&context, &TerminalObserver::new(false), &[], &packages)
            .expect_err("timed out");

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(
            err.to_string(),
            "Package restore took longer than expected for packages: Bar."
        );
    }
}
