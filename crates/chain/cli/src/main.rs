//! Chain CLI - plan and resolve dependency chains from JSON manifests
//!
//! This CLI lets developers:
//! - Check a manifest for dependency cycles and inspect declaration depths
//! - Resolve every declaration against the manifest's services
//! - Inspect per-declaration state transitions of a resolution

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod operations;
mod output;

use config::CliConfig;
use error::CliResult;

/// Chain CLI application
#[derive(Parser)]
#[command(name = "chain")]
#[command(about = "Chain - plan and resolve declared dependency chains", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CHAIN_CONFIG")]
    config: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Check a manifest for cycles and list declaration depths
    Plan {
        /// Path to the manifest (JSON)
        file: PathBuf,
    },

    /// Resolve every declaration of a manifest
    Resolve {
        /// Path to the manifest (JSON)
        file: PathBuf,

        /// Abort the resolution after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Also print the state of every declaration
        #[arg(long)]
        report: bool,
    },
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Plan { file } => commands::plan::execute(&file, cli.output),
        Commands::Resolve {
            file,
            timeout_ms,
            report,
        } => commands::resolve::execute(&file, timeout_ms, report, &config, cli.output).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(err) = run(cli).await {
        output::print_error(&err.to_string());
        std::process::exit(1);
    }
}
