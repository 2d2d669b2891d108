//! `kiota-emit check`

use anyhow::{Context, Result};
use kiota_emitter::diagnostics::{missing_options, no_clients};
use kiota_emitter::{EmitterConfig, GenerationConfiguration, GenerationLanguage};
use std::path::Path;

pub fn run(config_path: &Path, json: bool) -> Result<()> {
    let config = EmitterConfig::load(config_path)
        .with_context(|| format!("Failed to load configuration: {}", config_path.display()))?;
    config
        .log_level()
        .context("Invalid log level in configuration")?;

    let requests = resolve_requests(&config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&requests)?);
        return Ok(());
    }

    println!("Checking configuration: {}", config_path.display());
    for request in &requests {
        println!(
            "✓ {}: {} in {} -> {}",
            request.language,
            request.client_class_name,
            request.client_namespace_name,
            request.output_path
        );
    }
    if let Some(path) = &config.generator_path {
        println!("✓ Generator: {}", path.display());
    }
    println!("\nConfiguration is valid!");

    Ok(())
}

/// The generation request each configured client would send
///
/// Paths stay relative to the root output folder.
pub(crate) fn resolve_requests(config: &EmitterConfig) -> Result<Vec<GenerationConfiguration>> {
    let Some(options) = &config.options else {
        anyhow::bail!(missing_options().message);
    };
    if options.clients.is_empty() {
        anyhow::bail!(no_clients().message);
    }

    options
        .clients
        .iter()
        .map(|(language, client)| {
            let parsed = language
                .parse::<GenerationLanguage>()
                .with_context(|| format!("Client '{language}' cannot be generated"))?;
            Ok(GenerationConfiguration::for_client(
                parsed,
                client,
                Path::new("."),
            ))
        })
        .collect()
}
