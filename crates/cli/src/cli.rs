//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CSI Predictor - windowed sensor batch scoring pipeline
#[derive(Parser, Debug)]
#[command(
    name = "csi-predictor",
    author,
    version,
    about = "CSI window batch prediction pipeline",
    long_about = "A batch aggregation and dispatch engine for CSI sensor windows.\n\n\
                  Listens on per-producer unix sockets, accumulates decoded windows, \n\
                  scores each batch on a fixed cadence, and streams framed JSON results \n\
                  to the downstream consumer."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "CSI_PREDICTOR_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "CSI_PREDICTOR_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the prediction pipeline
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.toml",
        env = "CSI_PREDICTOR_CONFIG"
    )]
    pub config: PathBuf,

    /// Override dispatch interval in seconds from configuration
    #[arg(long, env = "CSI_PREDICTOR_INTERVAL")]
    pub interval: Option<f64>,

    /// Pipeline timeout in seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "CSI_PREDICTOR_TIMEOUT")]
    pub timeout: u64,

    /// Validate configuration and exit without running pipeline
    #[arg(long)]
    pub dry_run: bool,

    /// Log results instead of connecting to the result socket
    #[arg(long, env = "CSI_PREDICTOR_LOG_RESULTS")]
    pub log_results: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "9000", env = "CSI_PREDICTOR_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show the resolved producer endpoints
    #[arg(long)]
    pub endpoints: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
