//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// sigprof - signal-triggered runtime profiling
#[derive(Parser, Debug)]
#[command(
    name = "sigprof",
    author,
    version,
    about = "Signal-triggered runtime profiling",
    long_about = "Capture runtime profiles of a running process by sending it SIGUSR1 or SIGUSR2.\n\n\
                  Profiles for each signal are configured with SIGPROF_USR1 / SIGPROF_USR2 and \n\
                  written to stdout, stderr or uniquely named files (SIGPROF_OUT)."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SIGPROF_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SIGPROF_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a synthetic workload with profiling installed
    Demo(DemoArgs),

    /// Print the resolved profiling configuration
    Config(ConfigArgs),

    /// Send a trigger signal to a running process
    Trigger(TriggerArgs),
}

/// Arguments for the `demo` command
#[derive(Parser, Debug, Clone)]
pub struct DemoArgs {
    /// Stop after this many seconds (0 = run until Ctrl+C / SIGTERM)
    #[arg(long, default_value = "0", env = "SIGPROF_DEMO_DURATION")]
    pub duration: u64,

    /// Number of busy worker threads
    #[arg(long, default_value = "2", env = "SIGPROF_DEMO_WORKERS")]
    pub workers: usize,
}

/// Arguments for the `config` command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Configuration file (TOML or JSON); environment variables override it
    #[arg(short, long, env = "SIGPROF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `trigger` command
#[derive(Parser, Debug)]
pub struct TriggerArgs {
    /// Target process id
    #[arg(long)]
    pub pid: i32,

    /// Signal to send
    #[arg(long, value_enum, default_value = "usr1")]
    pub signal: TriggerSignal,
}

/// Trigger signals
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerSignal {
    /// SIGUSR1
    Usr1,
    /// SIGUSR2
    Usr2,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
