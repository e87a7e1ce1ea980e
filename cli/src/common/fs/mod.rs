//! # Screengen Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers used by the generator. Import the submodule directly:
//!
//! ```rust
//! use crate::common::fs::io::{self, WriteMode};
//!
//! io::ensure_dir(target.parent().unwrap())?;
//! io::write_file(&target, &content, WriteMode::FailIfExists)?;
//! ```
//!

/// Contains basic file I/O operations (`ensure_dir`, `read_file_to_string`, `write_file`).
pub mod io;
