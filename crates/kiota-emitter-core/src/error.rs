//! Error types for the emitter pipeline

use thiserror::Error;

/// Result type alias for emitter operations
pub type EmitterResult<T> = Result<T, EmitterError>;

/// Error type for emitter operations
///
/// Per-language generation problems are reported as diagnostics instead;
/// an `EmitterError` escaping the pipeline stops the whole run.
#[derive(Error, Debug)]
pub enum EmitterError {
    /// The API description document was not found after the description step
    #[error("OpenAPI file was not emitted, check the logs for errors: {path}")]
    DescriptionNotEmitted { path: String },

    /// The API description emitter itself failed
    #[error("API description emission failed: {0}")]
    DescriptionEmitFailed(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Language identifier that the generator does not know
    #[error("unknown generation language: {0}")]
    UnknownLanguage(String),

    /// A generator log level reached severity mapping without a diagnostic equivalent
    #[error("log level has no diagnostic severity: {0}")]
    UnmappedLogLevel(String),

    /// Generation through the generator channel failed
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl EmitterError {
    /// Returns a stable numeric code for the error kind
    pub fn error_code(&self) -> u32 {
        match self {
            EmitterError::DescriptionNotEmitted { .. } => 1,
            EmitterError::DescriptionEmitFailed(_) => 2,
            EmitterError::ConfigError(_) => 3,
            EmitterError::SerializationError(_) => 4,
            EmitterError::UnknownLanguage(_) => 5,
            EmitterError::UnmappedLogLevel(_) => 6,
            EmitterError::GenerationFailed(_) => 7,
            EmitterError::Io(_) => 8,
            EmitterError::Internal(_) => 9,
        }
    }
}

impl From<serde_json::Error> for EmitterError {
    fn from(err: serde_json::Error) -> Self {
        EmitterError::SerializationError(err.to_string())
    }
}

impl From<toml::de::Error> for EmitterError {
    fn from(err: toml::de::Error) -> Self {
        EmitterError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for EmitterError {
    fn from(err: std::io::Error) -> Self {
        EmitterError::Io(err.to_string())
    }
}
