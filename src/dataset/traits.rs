//! Dataset sink trait and error types

use crate::record::{DocumentId, MetadataRecord};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing the dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error on dataset {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error on dataset {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("Dataset {path} has an unexpected header: {found}")]
    HeaderMismatch { path: PathBuf, found: String },

    #[error("Malformed row {row} in dataset {path}: {message}")]
    Malformed {
        path: PathBuf,
        row: u64,
        message: String,
    },
}

/// Result type for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Trait for the tabular output the runner writes to
///
/// Rows are buffered by `append` and only become durable on `flush`, so an
/// interrupted run loses at most the rows appended since the last flush.
pub trait DatasetSink {
    /// Returns true if a row for `id` was already written or appended
    fn contains(&self, id: DocumentId) -> bool;

    /// Buffers one record for the next flush
    fn append(&mut self, record: MetadataRecord) -> DatasetResult<()>;

    /// Writes all buffered records to durable storage
    fn flush(&mut self) -> DatasetResult<()>;

    /// Flushes, then guarantees ascending, duplicate-free row order
    ///
    /// Returns the total number of rows in the finished dataset.
    fn finalize(&mut self) -> DatasetResult<usize>;
}
