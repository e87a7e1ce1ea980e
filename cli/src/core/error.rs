//! # Screengen Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error taxonomy of the generator. Every failure the
//! pipeline can report is one `GenError` variant, carried inside an
//! `anyhow::Error` so call sites can attach context with `.context()`.
//!
//! ## Architecture
//!
//! - `GenError`: A custom error enum using `thiserror` for specific error kinds
//! - `Result<T>`: A type alias for `anyhow::Result<T>`
//! - `ErrorScope`: Whether an error aborts the whole run or only the current row
//!
//! The orchestrator classifies failures by downcasting to `GenError`:
//!
//! ```rust
//! match result {
//!     Err(e) if GenError::find(&e).map_or(false, |ge| matches!(ge, GenError::Conflict { .. })) => {
//!         warn!("{}: skipped, target already exists", name);
//!     }
//!     Err(e) => error!("{}: {:#}", name, e),
//!     Ok(()) => {}
//! }
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the generator.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {source}")]
    Parse {
        #[from]
        source: csv::Error,
    },

    #[error("Invalid data in row {row}: {message}")]
    Data { row: usize, message: String },

    #[error("Template '{id}' not found (looked for '{}')", path.display())]
    TemplateNotFound { id: String, path: PathBuf },

    #[error("Template '{id}' is malformed: {message}")]
    TemplateSyntax { id: String, message: String },

    #[error("Template rendering error: {source}")]
    Template {
        #[from]
        source: tera::Error,
    },

    #[error("Refusing to overwrite existing file '{}'", path.display())]
    Conflict { path: PathBuf },

    #[error("Route registry error: {0}")]
    Registry(String),
}

/// Whether a failure aborts the run or only the row being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    Run,
    Row,
}

impl GenError {
    /// Wraps an `std::io::Error` together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn scope(&self) -> ErrorScope {
        match self {
            GenError::Config(_) | GenError::Registry(_) => ErrorScope::Run,
            _ => ErrorScope::Row,
        }
    }

    /// Finds the first `GenError` in an `anyhow` chain, if any.
    pub fn find(err: &anyhow::Error) -> Option<&GenError> {
        err.chain().find_map(|cause| cause.downcast_ref::<GenError>())
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_error_display() {
        let config_err = GenError::Config("missing required option 'vue.dto_template'".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: missing required option 'vue.dto_template'"
        );

        let conflict = GenError::Conflict {
            path: PathBuf::from("views/home/Home.ts"),
        };
        assert_eq!(
            conflict.to_string(),
            "Refusing to overwrite existing file 'views/home/Home.ts'"
        );

        let data = GenError::Data {
            row: 3,
            message: "column 'name' is empty".into(),
        };
        assert_eq!(data.to_string(), "Invalid data in row 3: column 'name' is empty");
    }

    #[test]
    fn test_find_through_context() {
        let err = Err::<(), _>(GenError::Conflict {
            path: PathBuf::from("a.txt"),
        })
        .context("writing artifact")
        .unwrap_err();
        let found = GenError::find(&err).expect("GenError should be in the chain");
        assert!(matches!(found, GenError::Conflict { .. }));
        assert_eq!(found.scope(), ErrorScope::Row);
    }

    #[test]
    fn test_scope_classification() {
        assert_eq!(GenError::Config("x".into()).scope(), ErrorScope::Run);
        assert_eq!(GenError::Registry("x".into()).scope(), ErrorScope::Run);
        assert_eq!(
            GenError::Data {
                row: 1,
                message: "x".into()
            }
            .scope(),
            ErrorScope::Row
        );
    }
}
