//! kiota-emitter-core - Core types, configuration and diagnostics
//!
//! This crate provides the foundational types shared by the emitter crates:
//! - [`EmitterError`] for error handling
//! - [`EmitterConfig`], [`EmitterOptions`] and [`ClientOptions`] for configuration
//! - [`Diagnostic`] and [`Severity`] for host-facing diagnostics
//! - [`Host`] and [`DiagnosticSink`] collaborator traits
//! - [`kebab_to_camel`] and [`convert_kebab_to_camel`] for option key normalization

mod config;
mod diagnostic;
mod error;
mod host;
mod naming;

pub use config::{ClientOptions, EmitterConfig, EmitterOptions};
pub use diagnostic::{Diagnostic, Severity, Target, codes};
pub use error::{EmitterError, EmitterResult};
pub use host::{DiagnosticCollector, DiagnosticSink, FsHost, Host};
pub use naming::{convert_kebab_to_camel, kebab_to_camel};

/// Log levels for the emitter's own logging
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Off = 5,
}

impl LogLevel {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Off,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = EmitterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "none" => Ok(LogLevel::Off),
            other => Err(EmitterError::ConfigError(format!(
                "unknown log level: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Off => write!(f, "OFF"),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ClientOptions, Diagnostic, DiagnosticCollector, DiagnosticSink, EmitterConfig,
        EmitterError, EmitterOptions, EmitterResult, FsHost, Host, LogLevel, Severity, Target,
        codes,
    };
}
