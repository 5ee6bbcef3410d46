//! # reportpub Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure that the commands build on:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and the crate-wide `Result` alias
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config::{self, Config};
//! use crate::core::error::{ReportpubError, Result};
//! ```
//!
pub mod config;
pub mod error;
