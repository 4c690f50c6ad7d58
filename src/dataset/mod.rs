//! Dataset module for the tabular harvest output
//!
//! This module handles all reading and writing of the CSV dataset, including:
//! - Creating the file with the fixed column header
//! - Discovering already-written document IDs for resume
//! - Buffered appends flushed at checkpoints
//! - Final ordering of the rows by document ID

mod csv_dataset;
mod traits;

pub use csv_dataset::{read_dataset, CsvDataset};
pub use traits::{DatasetError, DatasetResult, DatasetSink};

use std::path::Path;

/// Opens (or creates) the dataset at the configured path
pub fn open_dataset(path: &Path) -> DatasetResult<CsvDataset> {
    CsvDataset::open(path)
}
