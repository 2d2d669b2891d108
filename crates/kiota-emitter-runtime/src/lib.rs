//! kiota-emitter-runtime - generator subprocess bridge
//!
//! This crate provides:
//! - [`GeneratorBridge`] for running an operation against a `kiota rpc`
//!   subprocess with guaranteed teardown
//! - [`GeneratorLocator`] and [`ensure_present`] for finding the generator
//! - [`AsyncRuntime`] for driving the bridge from synchronous code

mod bridge;
mod error;
mod locate;
mod runtime;

pub use bridge::{BridgeOptions, FEATURE_FLAG_ENV, GeneratorBridge, RPC_ARGUMENT, UNKNOWN_ERROR};
pub use error::{BridgeError, BridgeResult};
pub use locate::{GENERATOR_BINARY, GeneratorLocator, SIDELOADING_ENV, ensure_present};
pub use runtime::{AsyncRuntime, RuntimeConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AsyncRuntime, BridgeError, BridgeOptions, GeneratorBridge, GeneratorLocator,
        RuntimeConfig,
    };
}
