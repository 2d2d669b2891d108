//! Changing the log level after start-up

use crate::callback::HostLogRouter;
use kiota_emitter_core::{EmitterError, EmitterResult, LogLevel};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{Registry, reload};

type FilterHandle = reload::Handle<LevelFilter, Registry>;

/// Level control over the subscriber installed by [`crate::init_logging`]
///
/// Changing the level moves both the stderr output and the host router.
pub struct ReloadHandle {
    filter: Mutex<Option<FilterHandle>>,
}

impl ReloadHandle {
    pub fn new() -> Self {
        Self {
            filter: Mutex::new(None),
        }
    }

    /// Handle for the process-wide subscriber
    pub fn global() -> &'static ReloadHandle {
        static INSTANCE: OnceCell<ReloadHandle> = OnceCell::new();
        INSTANCE.get_or_init(ReloadHandle::new)
    }

    /// Take control of the subscriber's level filter
    pub fn attach(&self, filter: FilterHandle) {
        *self.filter.lock() = Some(filter);
    }

    /// Apply `level` to the subscriber and the global router
    pub fn set_level(&self, level: LogLevel) -> EmitterResult<()> {
        let guard = self.filter.lock();
        let filter = guard
            .as_ref()
            .ok_or_else(|| EmitterError::Internal("logging is not initialized".to_string()))?;

        filter
            .reload(level_filter(level))
            .map_err(|e| EmitterError::Internal(format!("failed to change log level: {e}")))?;
        HostLogRouter::global().set_level(level);
        Ok(())
    }
}

impl Default for ReloadHandle {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Trace => LevelFilter::TRACE,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Off => LevelFilter::OFF,
    }
}
