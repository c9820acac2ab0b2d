use crate::{Driver, HookRegistry};
use std::sync::Arc;

/// Sink the debug client writes statement traces to.
pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Shared state behind a client and every builder it hands out.
///
/// Cloned by value into each builder so a builder sees a consistent
/// snapshot of driver and debug flag at creation time; the hook registry is
/// behind an `Arc` on purpose and is never copied, see [`HookRegistry`].
#[derive(Clone)]
pub struct Config {
    pub(crate) driver: Arc<dyn Driver>,
    pub(crate) debug: bool,
    pub(crate) log: LogSink,
    pub(crate) hooks: Arc<HookRegistry>,
}

impl Config {
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self {
            driver,
            debug: false,
            log: Arc::new(|message| log::debug!(target: "silo", "{}", message)),
            hooks: Arc::new(HookRegistry::new()),
        }
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }
}
