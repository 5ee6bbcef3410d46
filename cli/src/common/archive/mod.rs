//! # reportpub Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! Archive-related utilities. The only format reportpub produces is zip, the
//! format downstream consumers of the published test results unpack.
//!
//! - **`zip`**: builds a deflate-compressed zip file from a directory tree.
//!
//! ```rust
//! use crate::common::archive;
//!
//! let summary = archive::zip::create_zip_archive(source_dir, archive_path)?;
//! ```
//!

pub mod zip;
