//! Command-line interface for meterlog.
//!
//! Provides scriptable access to the meter database with four core
//! commands:
//! - `reading`: Add, remove and list meter readings
//! - `person`: Add, remove and list occupancy records
//! - `stats`: Show consumption statistics
//! - `invoice`: Compute a cost-distribution invoice

mod commands;

pub use commands::*;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::error::Result;

/// Utility meter tracker with fair cost distribution.
#[derive(Debug, Parser)]
#[command(name = "meterlog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the SQLite database (default: platform data directory).
    #[arg(long, global = true, env = "METERLOG_DB")]
    pub db: Option<PathBuf>,

    /// Output format for structured data.
    #[arg(short = 'o', long, global = true, default_value = "text", env = "METERLOG_OUTPUT")]
    pub output: OutputFormat,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn", env = "METERLOG_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Path to custom configuration file.
    #[arg(long, global = true, env = "METERLOG_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Structured JSON for machine consumption.
    Json,
}

/// Log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Errors, warnings, and informational messages.
    Info,
    /// All of the above plus debug messages.
    Debug,
    /// All messages including trace-level details.
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter directive.
    #[must_use]
    pub fn to_filter_string(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage meter readings.
    #[command(alias = "r")]
    Reading(ReadingArgs),

    /// Manage occupancy records.
    #[command(alias = "p")]
    Person(PersonArgs),

    /// Show consumption statistics.
    #[command(alias = "stat")]
    Stats(StatsArgs),

    /// Compute a cost-distribution invoice.
    #[command(alias = "i")]
    Invoice(InvoiceArgs),
}

/// Parse arguments and run the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match &cli.command {
        Commands::Reading(args) => commands::reading::run(&cli, &config, args),
        Commands::Person(args) => commands::person::run(&cli, &config, args),
        Commands::Stats(args) => commands::stats::run(&cli, &config, args),
        Commands::Invoice(args) => commands::invoice::run(&cli, &config, args),
    }
}

fn init_logging(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("meterlog={}", level.to_filter_string())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
