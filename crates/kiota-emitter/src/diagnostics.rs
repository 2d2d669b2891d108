//! Diagnostics reported by the emitter pipeline

use crate::generate::{GenerationResult, GeneratorLogLevel, LogEntry};
use kiota_emitter_core::{Diagnostic, DiagnosticSink, EmitterError, EmitterResult, Severity, codes};

impl TryFrom<GeneratorLogLevel> for Severity {
    type Error = EmitterError;

    fn try_from(level: GeneratorLogLevel) -> Result<Self, EmitterError> {
        match level {
            GeneratorLogLevel::Error => Ok(Severity::Error),
            GeneratorLogLevel::Warning => Ok(Severity::Warning),
            other => Err(EmitterError::UnmappedLogLevel(other.to_string())),
        }
    }
}

/// Whether a generator log entry is surfaced as a diagnostic
pub fn is_reportable(level: GeneratorLogLevel) -> bool {
    matches!(level, GeneratorLogLevel::Warning | GeneratorLogLevel::Error)
}

/// The host supplied no emitter options
pub fn missing_options() -> Diagnostic {
    Diagnostic::error(
        codes::MISSING_OPTIONS,
        "Kiota Emitter options are missing. No clients will be generated.",
    )
}

/// The emitter options name no client
pub fn no_clients() -> Diagnostic {
    Diagnostic::error(
        codes::NO_CLIENTS,
        "No clients configured for generation in Kiota Emitter options.",
    )
}

/// Generation for `language` produced no result
///
/// The message is `Kiota client generation failed for language {language}`
/// followed by `: {reason}`, so it varies with the failure. Match on
/// [`codes::GENERATION_FAILED`] or the prefix, never the whole text.
pub fn generation_failed(language: &str, reason: &str) -> Diagnostic {
    Diagnostic::error(
        codes::GENERATION_FAILED,
        format!("Kiota client generation failed for language {language}: {reason}"),
    )
}

/// Convert one generator log entry
pub fn log_diagnostic(entry: &LogEntry) -> EmitterResult<Diagnostic> {
    let severity = Severity::try_from(entry.level)?;
    Ok(Diagnostic::new(codes::LOG, entry.message.clone(), severity))
}

/// Report every warning and error the generator logged, in order
///
/// Returns how many diagnostics were reported.
pub fn report_generation_logs(
    sink: &dyn DiagnosticSink,
    result: &GenerationResult,
) -> EmitterResult<usize> {
    let diagnostics = result
        .logs
        .iter()
        .filter(|entry| is_reportable(entry.level))
        .map(log_diagnostic)
        .collect::<EmitterResult<Vec<_>>>()?;

    let count = diagnostics.len();
    for diagnostic in diagnostics {
        sink.report_diagnostic(diagnostic);
    }
    Ok(count)
}
