use std::sync::atomic::{AtomicUsize, Ordering};

use pkgrestore_core::{DisplayId, RestoreEvent, RestoreObserver};

/// Renders progress placeholders on the terminal's status line.
pub struct TerminalObserver {
    next_id: AtomicUsize,
    debug: bool,
}

impl TerminalObserver {
    #[must_use]
    pub const fn new(debug: bool) -> Self {
        Self {
            next_id: AtomicUsize::new(0),
            debug,
        }
    }
}

impl RestoreObserver for TerminalObserver {
    fn display(&self, message: &str) -> DisplayId {
        pkgrestore_logger::status(message);
        DisplayId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn update(&self, _id: DisplayId, message: &str) {
        if message.starts_with("Installed") {
            pkgrestore_logger::success(message);
        } else {
            pkgrestore_logger::status(message);
        }
    }

    fn publish(&self, event: RestoreEvent) {
        match event {
            RestoreEvent::PackageAdded(reference) => {
                pkgrestore_logger::debug(
                    &format!(
                        "{} -> {} ({} file(s))",
                        reference,
                        reference.package_root.display(),
                        reference.assembly_paths.len()
                    ),
                    self.debug,
                );
            }
            RestoreEvent::ErrorProduced(message) => pkgrestore_logger::error(&message),
        }
    }
}
