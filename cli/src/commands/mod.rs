//! # reportpub Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! One module per subcommand. Each exposes a `handle_*` function that takes
//! the already-loaded `Config`; `main.rs` maps the parsed subcommand onto it.
//!
//! - `archive`: zip the report directory
//! - `publish`: publish an existing archive
//! - `run`: archive, then publish (the default when no subcommand is given)
//!

/// `reportpub archive`: zip the report directory.
pub mod archive;
/// `reportpub publish`: publish an existing archive to the topic.
pub mod publish;
/// `reportpub run`: archive then publish.
pub mod run;
