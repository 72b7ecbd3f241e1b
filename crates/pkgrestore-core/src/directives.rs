use crate::context::RestoreContext;
use crate::progress::{DisplayId, ProgressSupervisor, RestoreEvent, RestoreObserver};
use crate::reference::{PackageReference, Reference};
use crate::result::RestoreResult;
use pkgrestore_constants::SOURCE_PREFIX;
use pkgrestore_error::{RestoreError, Result};
use pkgrestore_utils::{is_unconstrained, normalize_version};

/// Effects of the restore-source, package-reference and restore directives.
/// Parsing their text is left to whoever dispatches them.
pub struct DirectiveHandler<'a> {
    context: &'a RestoreContext,
    observer: &'a dyn RestoreObserver,
}

impl<'a> DirectiveHandler<'a> {
    #[must_use]
    pub fn new(context: &'a RestoreContext, observer: &'a dyn RestoreObserver) -> Self {
        Self { context, observer }
    }

    pub fn add_restore_source(&self, source: &str) -> DisplayId {
        let source = source.trim();
        let source = source.strip_prefix(SOURCE_PREFIX).unwrap_or(source);
        self.context.add_restore_source(source);

        let mut listing = String::from("Restore sources");
        for source in self.context.restore_sources() {
            listing.push_str("\n - ");
            listing.push_str(&source);
        }
        self.observer.display(&listing)
    }

    /// Publishes an `ErrorProduced` event and returns `None` when the request
    /// cannot be accepted.
    pub fn add_package_reference(&self, name: &str, version: Option<&str>) -> Option<Reference> {
        if let Some(existing) = self.context.find_package_reference(name)
            && !is_unconstrained(version)
            && normalize_version(version) != normalize_version(existing.version())
        {
            let err = RestoreError::ConflictingRequest {
                name: name.to_string(),
                requested: version.unwrap_or_default().trim().to_string(),
                existing: existing.version().unwrap_or("*").to_string(),
            };
            self.observer
                .publish(RestoreEvent::ErrorProduced(err.to_string()));
            return None;
        }

        let added = self.context.get_or_add_package_reference(name, version);
        if added.is_none() {
            let err =
                RestoreError::InvalidPackageSpec(PackageReference::new(name, version).to_string());
            self.observer
                .publish(RestoreEvent::ErrorProduced(err.to_string()));
        }
        added
    }

    pub async fn restore(&self) -> Result<RestoreResult> {
        ProgressSupervisor::new(self.context, self.observer)
            .run()
            .await
    }
}
