//! Error types for mapping-source loading.

use std::io::Error as IoError;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that occur while loading mapping sources.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O error when reading a source file.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// The mapping file is not valid JSON or does not match the expected shape.
    #[error("invalid mapping file: {0}")]
    Json(#[from] serde_json::Error),

    /// The context file is not valid CSV or lacks a required column.
    #[error("invalid context data: {0}")]
    Csv(#[from] csv::Error),

    /// A SELECT list in the query file could not be parsed.
    #[error("query syntax error at {line}:{column}: {message}")]
    Query {
        line: usize,
        column: usize,
        message: String,
    },

    /// A repeating-section descriptor is unusable.
    #[error("invalid repeating section '{name}': {message}")]
    Section { name: String, message: String },
}
