//! # reportpub ZIP Archive Operations (`common::archive::zip`)
//!
//! File: cli/src/common/archive/zip.rs
//!
//! ## Overview
//!
//! This module packs a directory of test reports into a single deflate
//! compressed zip file on disk. Every regular file below the source directory
//! becomes one entry; the entry name is the file's path relative to the
//! source root, always joined with `/` so archives built on Windows and Unix
//! agents look the same to whoever unpacks them.
//!
//! ## Architecture
//!
//! - `walkdir` performs the recursive walk, sorted by file name so two runs
//!   over the same tree produce entries in the same order. A symlink to a
//!   file is archived with its target's content; symlinked directories are
//!   not descended into, so links pointing outside the tree (or back up to
//!   an ancestor) cannot pull extra files in.
//! - The `zip` crate's `ZipWriter` streams each file into the archive; files
//!   are copied with `std::io::copy` rather than loaded whole.
//! - Directories never become entries of their own. An empty source directory
//!   therefore yields a valid zip with zero entries.
//! - The destination is truncated before writing, so rerunning always replaces
//!   the previous archive rather than adding to it.
//! - When the destination lives inside the source directory it is left out of
//!   the walk.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::zip;
//! use std::path::Path;
//!
//! let summary = zip::create_zip_archive(
//!     Path::new("src/build/reports"),
//!     Path::new("test-results-junit.zip"),
//! )?;
//! println!("{} entries, {} bytes", summary.entries, summary.bytes);
//! ```
//!
use crate::common::fs::io;
use crate::core::error::{ReportpubError, Result};
use anyhow::Context;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// What `create_zip_archive` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Path of the archive that was written.
    pub path: PathBuf,
    /// Number of file entries in the archive.
    pub entries: usize,
    /// Size of the finished archive on disk.
    pub bytes: u64,
}

/// # Create ZIP Archive (`create_zip_archive`)
///
/// Walks `source_dir` recursively and writes every regular file into a new
/// deflate-compressed zip at `dest`, replacing whatever was there before.
/// The parent directory of `dest` is created if needed.
///
/// ## Errors
///
/// Returns an `Err` if:
/// - `source_dir` does not exist, is not a directory, or cannot be walked.
/// - `dest` is a directory or cannot be created or written.
/// - Any file under `source_dir` cannot be read.
///
/// A failure part-way through leaves `dest` incomplete; callers must treat the
/// file as garbage whenever this function returns an error.
pub fn create_zip_archive(source_dir: &Path, dest: &Path) -> Result<ArchiveSummary> {
    let metadata = fs::metadata(source_dir)
        .with_context(|| format!("Failed to access source directory {:?}", source_dir))?;
    if !metadata.is_dir() {
        anyhow::bail!(ReportpubError::FileSystem(format!(
            "Source path is not a directory: {:?}",
            source_dir
        )));
    }
    if dest.is_dir() {
        anyhow::bail!(ReportpubError::FileSystem(format!(
            "Archive path is a directory: {:?}",
            dest
        )));
    }
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        io::ensure_dir_exists(parent)?;
    }

    let file = File::create(dest)
        .with_context(|| format!("Failed to create archive file {:?}", dest))?;
    let self_path = archive_inside_source(source_dir, dest);

    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let mut entries = 0usize;
    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to walk source directory {:?}", source_dir))?;
        if !is_archivable_file(&entry)? {
            continue;
        }
        if let Some(ref archive) = self_path {
            if fs::canonicalize(entry.path()).ok().as_ref() == Some(archive) {
                debug!("Skipping the archive itself: {:?}", entry.path());
                continue;
            }
        }

        let name = entry_name(source_dir, entry.path())?;
        zip.start_file(name.as_str(), options)
            .map_err(ReportpubError::from)
            .with_context(|| format!("Failed to start zip entry '{}'", name))?;
        let mut input = File::open(entry.path())
            .with_context(|| format!("Failed to open {:?} for archiving", entry.path()))?;
        std::io::copy(&mut input, &mut zip)
            .with_context(|| format!("Failed to add {:?} to the archive", entry.path()))?;
        debug!("Added to zip: {}", name);
        entries += 1;
    }

    let file = zip
        .finish()
        .map_err(ReportpubError::from)
        .context("Failed to finalize zip archive")?;
    let bytes = file
        .metadata()
        .with_context(|| format!("Failed to stat archive {:?}", dest))?
        .len();

    info!(
        "Created zip archive {:?} with {} entries ({} bytes) from {:?}",
        dest, entries, bytes, source_dir
    );
    Ok(ArchiveSummary {
        path: dest.to_path_buf(),
        entries,
        bytes,
    })
}

/// Regular files, plus symlinks whose target is a regular file.
fn is_archivable_file(entry: &walkdir::DirEntry) -> Result<bool> {
    if entry.file_type().is_file() {
        return Ok(true);
    }
    if !entry.path_is_symlink() {
        return Ok(false);
    }
    let target = fs::metadata(entry.path())
        .with_context(|| format!("Failed to resolve symlink {:?}", entry.path()))?;
    if target.is_dir() {
        debug!("Not descending into symlinked directory {:?}", entry.path());
    }
    Ok(target.is_file())
}

/// Canonical path of `dest` when it sits somewhere under `source_dir`.
fn archive_inside_source(source_dir: &Path, dest: &Path) -> Option<PathBuf> {
    let source = fs::canonicalize(source_dir).ok()?;
    let archive = fs::canonicalize(dest).ok()?;
    archive.starts_with(&source).then_some(archive)
}

/// Entry name for `path`: relative to `root`, components joined with `/`.
fn entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("{:?} is not inside {:?}", path, root))?;
    let parts = relative
        .components()
        .map(|c| {
            c.as_os_str().to_str().ok_or_else(|| {
                ReportpubError::FileSystem(format!(
                    "File name is not valid UTF-8: {:?}",
                    path
                ))
            })
        })
        .collect::<std::result::Result<Vec<&str>, ReportpubError>>()?;
    Ok(parts.join("/"))
}
