//! airgate - trust gate for air-quality telemetry
//!
//! Reads line-delimited JSON records, classifies each one as ok, tampered,
//! suspicious or invalid, and prints the results with a per-status summary.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod report;

/// airgate - trust gate for air-quality telemetry
#[derive(Parser, Debug)]
#[command(name = "airgate")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify every record of a telemetry stream
    Validate(commands::validate::ValidateArgs),

    /// Attach fresh signatures to a telemetry stream (producer side)
    Sign(commands::sign::SignArgs),
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries results only
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Validate(args) => commands::validate::run(&args),
        Commands::Sign(args) => commands::sign::run(&args),
    }
}
