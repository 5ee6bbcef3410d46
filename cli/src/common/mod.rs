//! # reportpub Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared building blocks used by the command handlers in `commands::`. Each
//! submodule covers one concern:
//!
//! - **`archive`**: builds the zip archive from the report directory.
//! - **`fs`**: path-aware file reads and directory creation.
//! - **`process`**: runs external commands (the `gcloud` token lookup).
//! - **`pubsub`**: topic names, the outbound message, credentials and the REST publisher.
//!
//! ```rust
//! use crate::common::{archive, fs, pubsub};
//!
//! let summary = archive::zip::create_zip_archive(&config.source_dir, &config.archive_path)?;
//! let bytes = fs::io::read_file_bytes(&summary.path)?;
//! let client = pubsub::connect(&config).await?;
//! ```
//!

/// Zip archive creation.
pub mod archive;
/// Filesystem I/O helpers.
pub mod fs;
/// External command execution.
pub mod process;
/// Pub/Sub publishing.
pub mod pubsub;
