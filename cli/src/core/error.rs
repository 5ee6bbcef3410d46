//! # reportpub Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout reportpub. Failures are
//! whatever the filesystem, the zip writer, or the publish transport surfaces;
//! this enum gives those failures names so `main` can print a readable message
//! and tests can match on the kind of failure.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `ReportpubError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover:
//! - Configuration errors (bad TOML, invalid topic names)
//! - Filesystem and archive errors
//! - Publish errors, split by HTTP outcome (401, 403, 404, other)
//! - External command errors (`gcloud auth print-access-token`)
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if !source.is_dir() {
//!     anyhow::bail!(ReportpubError::FileSystem(format!(
//!         "Source path is not a directory: {}",
//!         source.display()
//!     )));
//! }
//!
//! // Pattern matching on error kinds
//! match result {
//!     Err(e) if matches!(e.downcast_ref::<ReportpubError>(), Some(ReportpubError::TopicNotFound { .. })) => {
//!         eprintln!("Create the topic first.");
//!     }
//!     other => other?,
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for reportpub.
#[derive(Error, Debug)]
pub enum ReportpubError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Zip archive error: {source}")]
    Archive {
        #[from]
        source: zip::result::ZipError,
    },

    #[error("HTTP request to Pub/Sub failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("Not authenticated to Pub/Sub: {0}")]
    Unauthenticated(String),

    #[error("Permission denied publishing to '{topic}': {message}")]
    PermissionDenied { topic: String, message: String },

    #[error("Topic '{topic}' not found: {message}")]
    TopicNotFound { topic: String, message: String },

    #[error("Publish to '{topic}' rejected with HTTP {status}: {message}")]
    PublishRejected {
        topic: String,
        status: u16,
        message: String,
    },

    #[error("Payload of {size} bytes exceeds the maximum message size of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Publish to '{topic}' returned no message id")]
    EmptyPublishResponse { topic: String },

    #[error("External command failed: {cmd}, Status: {status}, Output:\n{output}")]
    ExternalCommand {
        cmd: String,
        status: String,
        output: String,
    },
}

/// Type alias for Result using anyhow::Error.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;
