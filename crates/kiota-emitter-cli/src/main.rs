//! kiota-emit - run the Kiota client emitter from the command line
//!
//! Commands:
//! - `kiota-emit emit` - Generate every configured client
//! - `kiota-emit check` - Validate an emitter configuration file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod check;
mod emit;

/// Configuration file used when `--config` is not given
const DEFAULT_CONFIG: &str = "kiota-emitter.toml";

#[derive(Parser)]
#[command(name = "kiota-emit")]
#[command(author, version, about = "Generate Kiota API clients from an OpenAPI description", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every client configured in the emitter options
    Emit {
        /// Emitter configuration (TOML, or JSON by extension)
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Output directory assigned to the emitter, e.g. tsp-output/@scope/package
        #[arg(short, long)]
        output_dir: PathBuf,

        /// OpenAPI description to hand to the generator
        #[arg(long)]
        openapi: PathBuf,

        /// Generator executable (overrides the configuration file)
        #[arg(short, long)]
        generator: Option<PathBuf>,

        /// Log level (overrides the configuration file)
        #[arg(short, long)]
        log_level: Option<String>,
    },

    /// Validate an emitter configuration file
    Check {
        /// Emitter configuration (TOML, or JSON by extension)
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Print the generation requests as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Emit {
            config,
            output_dir,
            openapi,
            generator,
            log_level,
        } => {
            emit::run(emit::EmitArgs {
                config,
                output_dir,
                openapi,
                generator,
                log_level,
            })?;
        }
        Commands::Check { config, json } => {
            check::run(&config, json)?;
        }
    }

    Ok(())
}
