//! The emission pipeline
//!
//! One run resolves the root output folder, has the API description
//! emitted there and then generates every configured client concurrently,
//! each on its own generator subprocess.

use crate::diagnostics::{generation_failed, missing_options, no_clients, report_generation_logs};
use crate::generate::{
    GenerationConfiguration, GenerationLanguage, OPENAPI_FILE_NAME, generate_client,
};
use crate::openapi::{ApiDescriptionEmitter, OpenApiEmitterOptions};
use crate::output::resolve_root_output_folder;
use futures_util::future::join_all;
use kiota_emitter_core::{
    ClientOptions, DiagnosticSink, EmitterError, EmitterOptions, EmitterResult, Host,
};
use kiota_emitter_runtime::GeneratorBridge;
use std::path::{Path, PathBuf};

/// Everything the host provides for one run
pub struct EmitContext<'a> {
    /// Directory the host assigned to this emitter
    pub emitter_output_dir: PathBuf,
    /// Validated emitter options, `None` when the host supplied none
    pub options: Option<EmitterOptions>,
    pub host: &'a dyn Host,
    pub diagnostics: &'a dyn DiagnosticSink,
}

impl<'a> EmitContext<'a> {
    /// Create a context
    pub fn new(
        emitter_output_dir: impl Into<PathBuf>,
        options: Option<EmitterOptions>,
        host: &'a dyn Host,
        diagnostics: &'a dyn DiagnosticSink,
    ) -> Self {
        Self {
            emitter_output_dir: emitter_output_dir.into(),
            options,
            host,
            diagnostics,
        }
    }
}

/// Generates Kiota clients for every language in the emitter options
pub struct KiotaEmitter {
    description: Box<dyn ApiDescriptionEmitter>,
    bridge: GeneratorBridge,
}

impl KiotaEmitter {
    /// Create an emitter
    pub fn new(description: impl ApiDescriptionEmitter + 'static, bridge: GeneratorBridge) -> Self {
        Self {
            description: Box::new(description),
            bridge,
        }
    }

    /// Bridge used for generator invocations
    pub fn bridge(&self) -> &GeneratorBridge {
        &self.bridge
    }

    /// Run the pipeline for one host invocation
    ///
    /// Configuration problems and per-language failures are reported as
    /// diagnostics and leave this returning `Ok`. An `Err` means the run
    /// could not proceed at all, e.g. no API description was emitted.
    pub async fn on_emit(&self, context: &EmitContext<'_>) -> EmitterResult<()> {
        let Some(options) = &context.options else {
            context.diagnostics.report_diagnostic(missing_options());
            return Ok(());
        };
        if options.clients.is_empty() {
            context.diagnostics.report_diagnostic(no_clients());
            return Ok(());
        }

        let root = std::path::absolute(resolve_root_output_folder(&context.emitter_output_dir))?;
        tracing::info!(
            root = %root.display(),
            clients = options.clients.len(),
            "Generating clients"
        );

        self.description
            .emit(&root, &OpenApiEmitterOptions::default())
            .await?;

        let description_path = root.join(OPENAPI_FILE_NAME);
        match context.host.read_file(&description_path).await {
            Some(contents) if !contents.is_empty() => {}
            _ => {
                return Err(EmitterError::DescriptionNotEmitted {
                    path: description_path.display().to_string(),
                });
            }
        }

        let generations = options
            .clients
            .iter()
            .map(|(language, client)| self.emit_client(context, &root, language, client));

        join_all(generations)
            .await
            .into_iter()
            .collect::<EmitterResult<Vec<()>>>()?;
        Ok(())
    }

    async fn emit_client(
        &self,
        context: &EmitContext<'_>,
        root: &Path,
        language: &str,
        client: &ClientOptions,
    ) -> EmitterResult<()> {
        let parsed = match language.parse::<GenerationLanguage>() {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(language, error = %err, "Skipping client");
                context
                    .diagnostics
                    .report_diagnostic(generation_failed(language, &err.to_string()));
                return Ok(());
            }
        };

        let configuration = GenerationConfiguration::for_client(parsed, client, root);
        match generate_client(&self.bridge, configuration).await {
            Ok(result) => {
                tracing::debug!(
                    language,
                    success = result.is_success,
                    logs = result.logs.len(),
                    "Generation finished"
                );
                report_generation_logs(context.diagnostics, &result)?;
                Ok(())
            }
            Err(err) => {
                context
                    .diagnostics
                    .report_diagnostic(generation_failed(language, &err.to_string()));
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "emitter/emitter_tests.rs"]
mod emitter_tests;
