//! Collaborator traits for the embedding host

use crate::Diagnostic;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::Path;

/// Read access to the host's file system
///
/// The emitter only needs to know whether a file exists and what it contains.
#[async_trait]
pub trait Host: Send + Sync {
    /// Read a file, returning `None` when it is absent or unreadable
    async fn read_file(&self, path: &Path) -> Option<String>;
}

/// Sink for diagnostics reported to the host
pub trait DiagnosticSink: Send + Sync {
    /// Report a diagnostic; diagnostics are never read back by the emitter
    fn report_diagnostic(&self, diagnostic: Diagnostic);
}

/// [`Host`] backed by the real file system
#[derive(Debug, Clone, Copy, Default)]
pub struct FsHost;

#[async_trait]
impl Host for FsHost {
    async fn read_file(&self, path: &Path) -> Option<String> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => Some(contents),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "File not readable");
                None
            }
        }
    }
}

/// [`DiagnosticSink`] that keeps every diagnostic in report order
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the diagnostics reported so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    /// Diagnostics with the given code
    pub fn with_code(&self, code: &str) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .iter()
            .filter(|d| d.code == code)
            .cloned()
            .collect()
    }

    /// Check if any error diagnostic was reported
    pub fn has_errors(&self) -> bool {
        self.diagnostics.lock().iter().any(Diagnostic::is_error)
    }

    /// Take all diagnostics, leaving the collector empty
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.lock())
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn report_diagnostic(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().push(diagnostic);
    }
}
