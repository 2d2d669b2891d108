//! # kiota-emitter
//!
//! Generate Kiota API clients from an emitted OpenAPI description.
//!
//! Each run resolves a shared root output folder, has the API description
//! written to `<root>/openapi.json` and then asks the `kiota` generator,
//! running as a `kiota rpc` subprocess, to generate one client per
//! configured language. Generator warnings and errors come back as host
//! diagnostics.
//!
//! ## Quick Start
//!
//! ```ignore
//! use kiota_emitter::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> EmitterResult<()> {
//!     let options = EmitterOptions::new().with_client(
//!         "csharp",
//!         ClientOptions {
//!             output_path: Some("clients/csharp".to_string()),
//!             ..ClientOptions::default()
//!         },
//!     );
//!
//!     let emitter = KiotaEmitter::new(
//!         CopyDescription::new("service/openapi.json"),
//!         GeneratorBridge::new(BridgeOptions::new()),
//!     );
//!
//!     let sink = DiagnosticCollector::new();
//!     let context = EmitContext::new("tsp-output/@contoso/kiota-emitter", Some(options), &FsHost, &sink);
//!     emitter.on_emit(&context).await?;
//!
//!     for diagnostic in sink.diagnostics() {
//!         eprintln!("{diagnostic}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - [`kiota_emitter_core`] - Errors, configuration and diagnostics
//! - [`kiota_emitter_transport`] - Stream adapters and the JSON-RPC message connection
//! - [`kiota_emitter_runtime`] - Generator location and the subprocess bridge
//! - [`kiota_emitter_logging`] - Tracing subscriber setup

pub mod diagnostics;
pub mod emitter;
pub mod generate;
pub mod openapi;
pub mod output;

pub use emitter::{EmitContext, KiotaEmitter};
pub use generate::{
    ConsumerOperation, DEFAULT_CLIENT_CLASS_NAME, DEFAULT_CLIENT_NAMESPACE_NAME,
    DEFAULT_OUTPUT_PATH, GENERATE_METHOD, GenerationConfiguration, GenerationLanguage,
    GenerationResult, GeneratorLogLevel, LogEntry, OPENAPI_FILE_NAME, generate_client,
};
pub use openapi::{ApiDescriptionEmitter, CopyDescription, OpenApiEmitterOptions};
pub use output::{SCOPE_MARKER, resolve_root_output_folder};

// Re-export core types
pub use kiota_emitter_core::{
    ClientOptions, Diagnostic, DiagnosticCollector, DiagnosticSink, EmitterConfig, EmitterError,
    EmitterOptions, EmitterResult, FsHost, Host, LogLevel, Severity, Target, codes,
    convert_kebab_to_camel, kebab_to_camel,
};

// Re-export the bridge
pub use kiota_emitter_runtime::{
    AsyncRuntime, BridgeError, BridgeOptions, GeneratorBridge, GeneratorLocator, RuntimeConfig,
};

// Re-export logging setup
pub use kiota_emitter_logging::{HostLogRouter, ReloadHandle, init_logging};

// Re-export the crates themselves for lower-level access
pub use kiota_emitter_core;
pub use kiota_emitter_logging;
pub use kiota_emitter_runtime;
pub use kiota_emitter_transport;

// Re-export common dependencies that embedders need
pub use async_trait::async_trait;

/// Prelude module for convenient imports.
///
/// Use `use kiota_emitter::prelude::*;` to import commonly used types.
pub mod prelude {
    pub use crate::{
        ApiDescriptionEmitter, BridgeOptions, ClientOptions, CopyDescription, Diagnostic,
        DiagnosticCollector, DiagnosticSink, EmitContext, EmitterConfig, EmitterError,
        EmitterOptions, EmitterResult, FsHost, GenerationLanguage, GeneratorBridge, Host,
        KiotaEmitter, Severity, async_trait,
    };
}
