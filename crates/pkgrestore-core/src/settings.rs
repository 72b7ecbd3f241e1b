use std::time::Duration;

use pkgrestore_constants::{POLL_INTERVAL_MS, RESTORE_TFM, RESTORE_TIMEOUT_SECS, SCRIPT_EXTENSION};

/// Per-session restore configuration. The moniker and script extension are
/// fixed once the session's context is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreSettings {
    pub poll_interval: Duration,
    pub timeout: Duration,
    pub target_framework: String,
    pub script_extension: String,
    pub debug: bool,
}

impl RestoreSettings {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl Default for RestoreSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            timeout: Duration::from_secs(RESTORE_TIMEOUT_SECS),
            target_framework: RESTORE_TFM.to_string(),
            script_extension: SCRIPT_EXTENSION.to_string(),
            debug: false,
        }
    }
}
