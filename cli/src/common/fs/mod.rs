//! # reportpub Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Entry point for filesystem helpers. Functionality currently lives in a
//! single submodule:
//!
//! - **`io`**: ensuring directories exist and reading files with path-aware
//!   error context.
//!
//! ```rust
//! use crate::common::fs::io;
//!
//! io::ensure_dir_exists(Path::new("build"))?;
//! let bytes = io::read_file_bytes(Path::new("build/test-results-junit.zip"))?;
//! ```
//!

/// Basic file I/O operations (`ensure_dir_exists`, `read_file_bytes`, `read_file_to_string`).
pub mod io;
