//! `kiota-emit emit`

use anyhow::{Context, Result};
use kiota_emitter::{
    AsyncRuntime, BridgeOptions, CopyDescription, DiagnosticCollector, EmitContext, EmitterConfig,
    FsHost, GeneratorBridge, KiotaEmitter, LogLevel, RuntimeConfig, init_logging,
};
use std::path::PathBuf;

/// Arguments of the `emit` command
pub struct EmitArgs {
    pub config: PathBuf,
    pub output_dir: PathBuf,
    pub openapi: PathBuf,
    pub generator: Option<PathBuf>,
    pub log_level: Option<String>,
}

pub fn run(args: EmitArgs) -> Result<()> {
    let config = EmitterConfig::load(&args.config)
        .with_context(|| format!("Failed to load configuration: {}", args.config.display()))?;

    let level = match &args.log_level {
        Some(level) => level.parse::<LogLevel>()?,
        None => config.log_level().context("Invalid log level in configuration")?,
    };
    init_logging(level);

    let emitter = KiotaEmitter::new(
        CopyDescription::new(&args.openapi),
        GeneratorBridge::new(bridge_options(&config, args.generator.clone())),
    );
    let sink = DiagnosticCollector::new();
    let clients = config.options.as_ref().map_or(0, |o| o.clients.len());
    let runtime = AsyncRuntime::new(&RuntimeConfig::for_clients(clients))
        .context("Failed to start async runtime")?;

    let outcome = runtime.block_on(async {
        let context = EmitContext::new(&args.output_dir, config.options.clone(), &FsHost, &sink);
        emitter.on_emit(&context).await
    });

    let diagnostics = sink.take();
    for diagnostic in &diagnostics {
        eprintln!("{diagnostic}");
    }
    outcome.context("Emission failed")?;

    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    if errors > 0 {
        anyhow::bail!("{errors} error diagnostic(s) reported");
    }

    tracing::info!(
        invocations = emitter.bridge().invocation_count(),
        warnings = diagnostics.len(),
        "Emission complete"
    );
    Ok(())
}

/// Generator settings, command line first
pub(crate) fn bridge_options(config: &EmitterConfig, generator: Option<PathBuf>) -> BridgeOptions {
    let mut options = BridgeOptions::new();
    if let Some(path) = generator.or_else(|| config.generator_path.clone()) {
        options = options.with_generator_path(path);
    }
    if let Some(timeout) = config.generation_timeout() {
        options = options.with_timeout(timeout);
    }
    options
}
