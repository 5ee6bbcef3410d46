//! # reportpub Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! `reportpub` is a one-shot CI utility: it zips a directory of test reports,
//! base64-encodes the archive and publishes it as a single message to a
//! Google Cloud Pub/Sub topic. This file handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading configuration and routing to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Archive src/build/reports and publish it with the built-in defaults
//! reportpub
//!
//! # Only build the archive, with more logging
//! reportpub -v archive --source-dir build/test-results
//!
//! # Publish an existing archive to a local emulator
//! PUBSUB_EMULATOR_HOST=localhost:8085 reportpub publish --submission-id 42
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Load and validate configuration
//! 4. Route to the command handler
//! 5. Print any error and exit with status 1
//!
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Subcommand handlers (archive, publish, run)
mod common; // Shared utilities (archive, fs, process, pubsub)
mod core; // Configuration and error types

use crate::core::config::{self, ConfigArgs};
use crate::core::error::Result;

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "reportpub",
    about = "📦 reportpub 📤: Zip CI test reports and publish them to a Pub/Sub topic",
    long_about = "Zip a directory of test reports, base64-encode the archive and publish it\n\
                  as a single message to a Google Cloud Pub/Sub topic.\n\
                  Without a subcommand, `run` is assumed.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    #[command(flatten)]
    config: ConfigArgs,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Archive the report directory, then publish it (default).
    Run,
    /// Only create the zip archive.
    #[command(alias = "a")]
    Archive,
    /// Only publish an existing archive.
    #[command(alias = "p")]
    Publish,
}

async fn dispatch(command: Commands, config_args: &ConfigArgs) -> Result<()> {
    let config = config::load_config(config_args)?;
    match command {
        Commands::Run => commands::run::handle_run(&config).await,
        Commands::Archive => commands::archive::handle_archive(&config).map(|_| ()),
        Commands::Publish => commands::publish::handle_publish(&config)
            .await
            .map(|_| ()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli.command);

    let command = cli.command.unwrap_or(Commands::Run);
    if let Err(e) = dispatch(command, &cli.config).await {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
