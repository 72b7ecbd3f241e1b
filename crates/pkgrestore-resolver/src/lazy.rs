use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, OnceLock};

use crate::engine::DependencyEngine;
use pkgrestore_error::{RestoreError, Result};

pub type EngineFactory = Box<dyn Fn() -> Result<Arc<dyn DependencyEngine>> + Send + Sync>;

/// Session-owned engine handle: built on first use, reused afterwards, and
/// disposed on drop only if it was ever built. A failed construction is
/// remembered and returned on every later call.
pub struct LazyEngine {
    factory: EngineFactory,
    engine: OnceLock<std::result::Result<Arc<dyn DependencyEngine>, RestoreError>>,
}

impl LazyEngine {
    #[must_use]
    pub fn new(factory: EngineFactory) -> Self {
        Self {
            factory,
            engine: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Result<Arc<dyn DependencyEngine>> {
        self.engine
            .get_or_init(|| (self.factory)())
            .as_ref()
            .map(Arc::clone)
            .map_err(Clone::clone)
    }

    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self.engine.get(), Some(Ok(_)))
    }
}

impl Drop for LazyEngine {
    fn drop(&mut self) {
        let Some(Ok(engine)) = self.engine.get() else {
            return;
        };

        match catch_unwind(AssertUnwindSafe(|| engine.dispose())) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                pkgrestore_logger::debug(&format!("Ignoring engine disposal failure: {e}"), true);
            }
            Err(_) => {
                pkgrestore_logger::debug("Ignoring panic during engine disposal", true);
            }
        }
    }
}
