//! # Screengen Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! This module centralizes the filesystem operations the generator performs:
//! ensuring output directories exist, reading files into strings, and writing
//! generated content under an explicit [`WriteMode`].
//!
//! ## Architecture
//!
//! - **`ensure_dir`**: Recursive, idempotent directory creation. Reports whether
//!   the directory was created, and tolerates another writer creating it first.
//! - **`read_file_to_string`**: `fs::read_to_string` with the path attached to errors.
//! - **`write_file`**: Writes content with `Overwrite`, `Append` or `FailIfExists`
//!   semantics. The parent directory must already exist; callers ensure it.
//! - **`replace_file`**: Atomic replacement (temporary file + rename) for files
//!   the user owns, such as the screen list CSV and the route registry.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::io::{self, WriteMode};
//!
//! io::ensure_dir(Path::new("out/fixtures"))?;
//! io::write_file(Path::new("out/fixtures/FooFixture.json"), "{}", WriteMode::FailIfExists)?;
//! ```
//!
use crate::core::error::{GenError, Result};
use anyhow::{anyhow, Context};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// How `write_file` treats an existing target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum WriteMode {
    /// Refuse to touch an existing file (`GenError::Conflict`).
    #[default]
    FailIfExists,
    /// Replace the file's content.
    Overwrite,
    /// Add to the end of the file, creating it if absent.
    Append,
}

/// Ensures that a directory exists at the specified path.
///
/// Creates missing parents like `mkdir -p`. Returns `true` when the directory
/// was created by this call and `false` when it already existed, including the
/// case where a concurrent caller created it in between.
///
/// # Errors
///
/// Returns an `Err` if the path exists but is not a directory, or if creating
/// it fails (e.g., permissions).
pub fn ensure_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        debug!("Directory already exists: {}", path.display());
        return Ok(false);
    }
    if path.exists() {
        anyhow::bail!(GenError::io(
            path,
            std::io::Error::new(ErrorKind::AlreadyExists, "path exists but is not a directory"),
        ));
    }
    match fs::create_dir_all(path) {
        Ok(()) => {
            info!("Created directory: {}", path.display());
            Ok(true)
        }
        // Lost a race against another creator; the outcome is the same.
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(false),
        Err(e) => Err(anyhow!(GenError::io(path, e)))
            .with_context(|| format!("Failed to create directory {}", path.display())),
    }
}

/// Reads the entire content of a file into a string.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| GenError::io(path, e))
        .with_context(|| format!("Failed to read file {}", path.display()))
}

/// Writes `content` to `path` according to `mode`.
///
/// # Errors
///
/// - `GenError::Conflict` when `mode` is `FailIfExists` and the file exists.
/// - `GenError::Io` when opening or writing fails.
pub fn write_file(path: &Path, content: &str, mode: WriteMode) -> Result<()> {
    let mut options = OpenOptions::new();
    match mode {
        WriteMode::FailIfExists => options.write(true).create_new(true),
        WriteMode::Overwrite => options.write(true).create(true).truncate(true),
        WriteMode::Append => options.append(true).create(true),
    };
    let mut file = match options.open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists && mode == WriteMode::FailIfExists => {
            return Err(anyhow!(GenError::Conflict {
                path: path.to_path_buf()
            }));
        }
        Err(e) => {
            return Err(anyhow!(GenError::io(path, e)))
                .with_context(|| format!("Failed to open {} for writing", path.display()));
        }
    };
    file.write_all(content.as_bytes())
        .map_err(|e| GenError::io(path, e))
        .with_context(|| format!("Failed to write to file {}", path.display()))?;
    info!("Wrote {} ({:?})", path.display(), mode);
    Ok(())
}

/// Replaces the content of `path` with `content` without ever leaving a
/// truncated file behind: the text is written to a temporary file in the same
/// directory, which is then renamed over the target.
pub fn replace_file(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)
        .map_err(|e| GenError::io(dir, e))
        .with_context(|| format!("Failed to create temporary file next to {}", path.display()))?;
    staged
        .write_all(content.as_bytes())
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| GenError::io(staged.path(), e))
        .with_context(|| format!("Failed to stage new content for {}", path.display()))?;
    staged
        .persist(path)
        .map_err(|e| GenError::io(path, e.error))
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    info!("Replaced {}", path.display());
    Ok(())
}
