//! # reportpub Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Runs external commands and captures their output. reportpub only shells
//! out for one thing: asking the Google Cloud SDK for an access token
//! (`gcloud auth print-access-token`) when none was configured. Non-zero exits
//! are mapped into `ReportpubError::ExternalCommand` with the command's stderr
//! attached.
//!
//! ```rust
//! let token = process::run_command_capture("gcloud", &["auth", "print-access-token"]).await?;
//! ```
//!
use crate::core::error::{ReportpubError, Result};
use anyhow::Context;
use tokio::process::Command;
use tracing::debug;

/// Runs `cmd` with `args` and returns its standard output.
///
/// # Errors
///
/// Returns an `Err` if the command cannot be spawned (e.g., not installed) or
/// exits with a non-zero status.
pub async fn run_command_capture(cmd: &str, args: &[&str]) -> Result<String> {
    let command_line = if args.is_empty() {
        cmd.to_string()
    } else {
        format!("{} {}", cmd, args.join(" "))
    };
    debug!("Running external command: {}", command_line);

    let output = Command::new(cmd)
        .args(args)
        .output()
        .await
        .with_context(|| format!("Failed to execute '{}'", command_line))?;

    if !output.status.success() {
        anyhow::bail!(ReportpubError::ExternalCommand {
            cmd: command_line,
            status: output.status.to_string(),
            output: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
