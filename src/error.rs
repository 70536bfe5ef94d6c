//! Error types for pdf-dl
//!
//! Only setup and internal failures surface as [`Error`]; anything that goes
//! wrong while resolving a single request (timeouts, bad status codes, wrong
//! content types, save failures) is absorbed by the fetch unit and reported
//! as a `Failed` outcome instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdf-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pdf-dl
///
/// Every variant here is a fatal setup failure: the source file,
/// directories, or schema is broken before any dispatch. Per-item download
/// failures never appear as this type, and the orchestrator itself is
/// infallible by construction.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "source_path")
        key: Option<String>,
    },

    /// Request source error (missing file, malformed schema)
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// CSV read or write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error outside the per-item fetch boundary (e.g. client construction)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl Error {
    /// Create a configuration error for a specific key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

/// Request source errors (fatal, pre-dispatch)
#[derive(Debug, Error)]
pub enum SourceError {
    /// Source spreadsheet does not exist
    #[error("source file not found: {path}")]
    NotFound {
        /// Path that was checked
        path: PathBuf,
    },

    /// A required column is absent from the sheet header
    #[error("missing required column: {column}")]
    MissingColumn {
        /// Name of the missing column
        column: String,
    },
}
