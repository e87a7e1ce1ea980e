//! # Screengen Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared helpers that are not specific to one command. Currently only
//! filesystem operations live here; command logic stays in `commands::` and
//! infrastructure in `core::`.
//!

/// Utilities for filesystem operations (directory creation, reads, mode-aware writes).
pub mod fs;
