//! # reportpub Run Command
//!
//! File: cli/src/commands/run.rs
//!
//! ## Overview
//!
//! `reportpub run` (and plain `reportpub`) performs the whole pipeline:
//! archive the report directory, then publish the archive. Publishing only
//! starts once the archive has been completely written; if archiving fails,
//! nothing is published.
//!
use super::{archive, publish};
use crate::core::config::Config;
use crate::core::error::Result;
use tracing::info;

/// Archives, then publishes.
pub async fn handle_run(config: &Config) -> Result<()> {
    let summary = archive::handle_archive(config)?;
    info!(
        "Archive ready ({} entries, {} bytes); publishing.",
        summary.entries, summary.bytes
    );
    publish::handle_publish(config).await?;
    Ok(())
}
