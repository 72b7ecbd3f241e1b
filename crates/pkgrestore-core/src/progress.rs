use indexmap::IndexMap;
use std::sync::Arc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::context::RestoreContext;
use crate::reference::{PackageReference, ResolvedPackageReference};
use crate::result::RestoreResult;
use pkgrestore_error::{RestoreError, Result};

/// Handle to a displayed value that can be updated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayId(pub usize);

#[derive(Debug, Clone)]
pub enum RestoreEvent {
    PackageAdded(Arc<ResolvedPackageReference>),
    ErrorProduced(String),
}

/// Display and event surface of the hosting session.
pub trait RestoreObserver: Send + Sync {
    fn display(&self, message: &str) -> DisplayId;
    fn update(&self, id: DisplayId, message: &str);
    fn publish(&self, event: RestoreEvent);
}

struct Placeholder {
    package: Arc<PackageReference>,
    display: DisplayId,
    message: String,
}

#[must_use]
pub fn installing_message(package: &PackageReference) -> String {
    match package.constrained_version() {
        Some(version) => format!("Installing package {}, version {version}", package.name),
        None => format!("Installing package {}", package.name),
    }
}

#[must_use]
pub fn installed_message(name: &str, version: Option<&str>) -> String {
    format!("Installed package {name} version {}", version.unwrap_or_default())
}

/// Runs one restore while keeping a progress line per newly requested package.
pub struct ProgressSupervisor<'a> {
    context: &'a RestoreContext,
    observer: &'a dyn RestoreObserver,
}

impl<'a> ProgressSupervisor<'a> {
    #[must_use]
    pub fn new(context: &'a RestoreContext, observer: &'a dyn RestoreObserver) -> Self {
        Self { context, observer }
    }

    /// Only a timeout is returned as an error. Hitting it abandons the wait;
    /// the engine call itself may keep running in the background.
    pub async fn run(&self) -> Result<RestoreResult> {
        let settings = self.context.settings();
        let newly_requested = self.context.newly_requested();

        let mut placeholders: IndexMap<String, Placeholder> = IndexMap::new();
        for package in newly_requested {
            let message = format!("{}...", installing_message(&package));
            let display = self.observer.display(&message);
            placeholders.insert(
                package.key(),
                Placeholder {
                    package,
                    display,
                    message,
                },
            );
        }

        let deadline = Instant::now() + settings.timeout;
        let mut ticker = tokio::time::interval_at(
            Instant::now() + settings.poll_interval,
            settings.poll_interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let restore = self.context.restore_async();
        tokio::pin!(restore);

        let result = loop {
            tokio::select! {
                biased;
                result = &mut restore => break result,
                () = tokio::time::sleep_until(deadline) => {
                    let packages = placeholders
                        .values()
                        .map(|p| p.package.name.clone())
                        .collect();
                    return Err(RestoreError::TimeoutExceeded { packages });
                }
                _ = ticker.tick() => {
                    for placeholder in placeholders.values_mut() {
                        placeholder.message.push('.');
                        self.observer.update(placeholder.display, &placeholder.message);
                    }
                }
            }
        };

        if result.succeeded {
            self.report_installed(&result, placeholders);
        } else {
            let errors = result.errors.clone().unwrap_or_default();
            pkgrestore_logger::debug(&format!("Restore failed: {errors}"), settings.debug);
            self.observer.publish(RestoreEvent::ErrorProduced(errors));
        }

        Ok(result)
    }

    fn report_installed(&self, result: &RestoreResult, mut placeholders: IndexMap<String, Placeholder>) {
        for reference in &result.resolved_references {
            if let Some(placeholder) = placeholders.shift_remove(&reference.key()) {
                self.observer.update(
                    placeholder.display,
                    &installed_message(&reference.name, Some(reference.version.as_str())),
                );
            }
            self.observer
                .publish(RestoreEvent::PackageAdded(Arc::clone(reference)));
        }

        // Not re-checked against the resolver: anything still waiting is shown
        // as installed at the version that was asked for.
        for placeholder in placeholders.values() {
            self.observer.update(
                placeholder.display,
                &installed_message(&placeholder.package.name, placeholder.package.version.as_deref()),
            );
        }
    }
}
