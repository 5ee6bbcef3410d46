//! # reportpub Archive Command
//!
//! File: cli/src/commands/archive.rs
//!
//! ## Overview
//!
//! `reportpub archive` zips the configured report directory into the
//! configured archive path and stops there. It is also the first half of
//! `reportpub run`.
//!
//! ```bash
//! reportpub archive --source-dir build/reports --archive build/reports.zip
//! ```
//!
use crate::common::archive::zip::{self, ArchiveSummary};
use crate::core::config::Config;
use crate::core::error::Result;
use anyhow::Context;
use tracing::{info, warn};

/// Builds the archive and prints the confirmation line.
///
/// # Errors
///
/// Propagates any failure from `create_zip_archive`, with the source and
/// destination named in the error context.
pub fn handle_archive(config: &Config) -> Result<ArchiveSummary> {
    info!(
        "Archiving {} into {}",
        config.source_dir.display(),
        config.archive_path.display()
    );
    let summary = zip::create_zip_archive(&config.source_dir, &config.archive_path)
        .with_context(|| {
            format!(
                "Failed to zip folder {} into {}",
                config.source_dir.display(),
                config.archive_path.display()
            )
        })?;
    if summary.entries == 0 {
        warn!(
            "No files found under {}; the archive is empty.",
            config.source_dir.display()
        );
    }
    println!(
        "✅ Zipped folder {} -> {} ({} files)",
        config.source_dir.display(),
        summary.path.display(),
        summary.entries
    );
    Ok(summary)
}
