//! Bridge error type

use kiota_emitter_core::EmitterError;
use kiota_emitter_transport::ConnectionError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Failure of one bridged generator invocation
///
/// Every variant is returned as a value; nothing escapes the bridge as a
/// panic.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// No generator executable could be located
    #[error("generator executable not found: {0}")]
    GeneratorNotFound(String),

    /// The located generator is missing or cannot be executed
    #[error("generator is not an executable file: {}", .path.display())]
    GeneratorNotExecutable { path: PathBuf },

    /// The working directory could not be resolved or created
    #[error("working directory {} is unusable: {message}", .path.display())]
    WorkingDirectory { path: PathBuf, message: String },

    /// The generator subprocess could not be started
    #[error("failed to start generator: {0}")]
    Spawn(String),

    /// The message channel could not be started
    #[error("message channel failed: {0}")]
    Channel(#[from] ConnectionError),

    /// The callback failed; carries the remote detail message or a generic one
    #[error("{0}")]
    Callback(String),

    /// The callback did not finish within the configured deadline
    #[error("generator did not answer within {0:?}")]
    Timeout(Duration),
}

impl BridgeError {
    /// Returns a stable numeric code for the error kind
    pub fn error_code(&self) -> u32 {
        match self {
            BridgeError::GeneratorNotFound(_) => 1,
            BridgeError::GeneratorNotExecutable { .. } => 2,
            BridgeError::WorkingDirectory { .. } => 3,
            BridgeError::Spawn(_) => 4,
            BridgeError::Channel(_) => 5,
            BridgeError::Callback(_) => 6,
            BridgeError::Timeout(_) => 7,
        }
    }
}

impl From<BridgeError> for EmitterError {
    fn from(err: BridgeError) -> Self {
        EmitterError::GenerationFailed(err.to_string())
    }
}
