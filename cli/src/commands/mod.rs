//! # Screengen Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Top-level command groups of the Screengen CLI. Each module defines its own
//! clap arguments struct and an async `handle_*` function called from
//! `main.rs`.
//!
//! - `generate`: render source files from a screen list CSV
//! - `templates`: list the templates available to each family
//!

/// Generation pipeline: CSV loading, normalization, rendering, route registry.
pub mod generate;
/// Lists the template files found in the configured template directory.
pub mod templates;
