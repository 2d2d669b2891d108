//! Routing of emitter log events to the embedding host

use kiota_emitter_core::LogLevel;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Host callback receiving `(level, target, message)`
///
/// This is where the bridge's "Error in generator callback" warnings end
/// up when the emitter runs inside another process.
pub type LogCallback = Arc<dyn Fn(LogLevel, &str, &str) + Send + Sync>;

static ROUTER: OnceCell<HostLogRouter> = OnceCell::new();

/// Holds the host callback and the minimum level it receives
pub struct HostLogRouter {
    callback: RwLock<Option<LogCallback>>,
    min_level: AtomicU8,
}

impl HostLogRouter {
    /// Router with no callback, accepting `Info` and above
    pub fn new() -> Self {
        Self {
            callback: RwLock::new(None),
            min_level: AtomicU8::new(LogLevel::Info as u8),
        }
    }

    /// Process-wide router used by [`crate::init_logging`]
    pub fn global() -> &'static HostLogRouter {
        ROUTER.get_or_init(HostLogRouter::new)
    }

    /// Route events to `callback`, replacing any previous one
    pub fn install(&self, callback: LogCallback) {
        *self.callback.write() = Some(callback);
    }

    /// Stop routing events
    pub fn clear(&self) {
        *self.callback.write() = None;
    }

    pub fn is_installed(&self) -> bool {
        self.callback.read().is_some()
    }

    pub fn set_level(&self, level: LogLevel) {
        self.min_level.store(level as u8, Ordering::SeqCst);
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.min_level.load(Ordering::SeqCst))
    }

    /// Whether an event at `level` reaches the callback
    pub fn accepts(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level >= self.level()
    }

    /// Hand one event to the callback, if any
    pub fn forward(&self, level: LogLevel, target: &str, message: &str) {
        if !self.accepts(level) {
            return;
        }

        // Invoked outside the lock; a callback may reinstall itself.
        let callback = self.callback.read().clone();
        if let Some(callback) = callback {
            callback(level, target, message);
        }
    }
}

impl Default for HostLogRouter {
    fn default() -> Self {
        Self::new()
    }
}
