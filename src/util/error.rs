//! Error types for the exporter.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for export operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Object not found in the host scene
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Named object collection does not exist
    #[error("No '{0}' collection found")]
    CollectionNotFound(String),

    /// Host failed to evaluate an object's world transform
    #[error("Failed to evaluate '{object}' at frame {frame}: {message}")]
    Evaluation {
        object: String,
        frame: i64,
        message: String,
    },

    /// Host mesh exporter failed
    #[error("Mesh export to {} failed: {message}", .path.display())]
    MeshExport { path: PathBuf, message: String },

    /// Malformed line in an exported text file
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a parse error for a 1-based line number.
    pub fn parse(line: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: msg.into(),
        }
    }
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, Error>;
