//! Analysis error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while analyzing a dataset or writing its report
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Dataset {path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: String },
}

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
