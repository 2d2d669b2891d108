//! kiota-emitter-logging - tracing setup and host log callback bridge
//!
//! This crate provides:
//! - [`init_logging`] to install the emitter's tracing subscriber
//! - [`HostLoggingLayer`] that forwards events to a host [`LogCallback`]
//! - [`ReloadHandle`] for changing the log level at run time

mod callback;
mod layer;
mod reload;

pub use callback::{LogCallback, HostLogRouter};
pub use kiota_emitter_core::LogLevel;
pub use layer::{HostLoggingLayer, init_logging};
pub use reload::ReloadHandle;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        HostLoggingLayer, LogCallback, HostLogRouter, LogLevel, ReloadHandle, init_logging,
    };
}
