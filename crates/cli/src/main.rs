//! # sigprof CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - A demo workload with profiling installed
//! - Configuration inspection
//! - Sending trigger signals to other processes

mod cli;
mod commands;
mod error;

use anyhow::Result;
use clap::Parser;
use tikv_jemallocator::Jemalloc;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_config, run_demo, run_trigger};

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "sigprof CLI starting");

    let result = match &cli.command {
        Commands::Demo(args) => run_demo(args).await,
        Commands::Config(args) => run_config(args),
        Commands::Trigger(args) => run_trigger(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    observability::init_with_config(observability::ObservabilityConfig {
        log_format: cli.log_format.into(),
        default_log_level: default_log_level.to_string(),
    })
}
