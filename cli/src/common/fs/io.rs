//! # reportpub Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Thin wrappers around `std::fs` that attach the offending path to every
//! error, so a failure deep inside archiving or publishing still tells the
//! operator which file was the problem.
//!
//! - **`ensure_dir_exists`**: creates a directory (and parents) if missing, and
//!   rejects paths that exist but are not directories. Used for the archive's
//!   parent directory.
//! - **`read_file_bytes`**: reads a whole file as bytes. Used to load the archive
//!   before publishing.
//! - **`read_file_to_string`**: reads a whole file as UTF-8. Used for config files.
//!
use crate::core::error::{ReportpubError, Result};
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path.
///
/// If the path does not exist, it is created along with any missing parents
/// (like `mkdir -p`).
///
/// # Errors
///
/// Returns an `Err` if:
/// - The path exists but is not a directory.
/// - Creating the directory fails (e.g., due to permissions).
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(ReportpubError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Reads the entire content of a file into a byte vector.
///
/// # Errors
///
/// Returns an `Err` if the file cannot be found, opened, or read, with context
/// naming the file.
pub fn read_file_bytes(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read file {:?}", path))?;
    debug!("Read {} bytes from {:?}", bytes.len(), path);
    Ok(bytes)
}

/// Reads the entire content of a file into a string.
///
/// # Errors
///
/// Returns an `Err` if the file cannot be read or is not valid UTF-8.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}
