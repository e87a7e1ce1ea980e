//! # Screengen Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces used by every command:
//! - `config`: configuration loading, merging and required-option lookup
//! - `error`: the `GenError` type and the crate-wide `Result`
//! - `templating`: template loading and rendering with configurable delimiters
//!
//! ```rust
//! use crate::core::config;
//! use crate::core::error::{GenError, Result};
//! use crate::core::templating::{Delimiters, RenderContext, Renderer};
//! ```
//!
pub mod config;
pub mod error;
pub mod templating;
