//! Error types for the listing pipeline.
//!
//! Only document-level and I/O-level failures are represented here. Field
//! parse failures become sentinel values and rule violations become
//! [`ValidationError`](crate::validate::ValidationError) entries; neither
//! aborts a run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that abort a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input document does not exist
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The input document exists but could not be read as UTF-8 text
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An output artifact could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Other I/O failure (path resolution, directory creation)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV rendering error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON rendering error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record-fragment selector failed to compile
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}
