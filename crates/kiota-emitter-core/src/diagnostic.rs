//! Host-facing diagnostics

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stable diagnostic codes reported by the emitter
pub mod codes {
    /// The host supplied no emitter options at all
    pub const MISSING_OPTIONS: &str = "kiota-emitter-missing-options";
    /// The options contain no client to generate
    pub const NO_CLIENTS: &str = "kiota-emitter-no-clients";
    /// Generation for one language produced no result
    pub const GENERATION_FAILED: &str = "kiota-emitter-generation-failed";
    /// A warning or error logged by the generator
    pub const LOG: &str = "kiota-emitter-log";
}

/// Diagnostic severity understood by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Location a diagnostic refers to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Not tied to any source location
    #[default]
    NoTarget,
    /// A file on disk (configuration files, emitted documents)
    Path(PathBuf),
}

/// A structured, coded message for the host's diagnostic surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub target: Target,
    pub severity: Severity,
}

impl Diagnostic {
    /// Create a diagnostic without a target
    pub fn new(code: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            target: Target::NoTarget,
            severity,
        }
    }

    /// Create an error diagnostic without a target
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message, Severity::Error)
    }

    /// Create a warning diagnostic without a target
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message, Severity::Warning)
    }

    /// Set the target
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Check if this is an error diagnostic
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Target::Path(path) = &self.target {
            write!(f, "{}: ", path.display())?;
        }
        write!(f, "{} {}: {}", self.severity, self.code, self.message)
    }
}
