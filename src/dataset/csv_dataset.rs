//! CSV dataset implementation
//!
//! This module provides a CSV-backed implementation of the `DatasetSink`
//! trait. The file is only ever appended to during a run; finalization
//! rewrites it (through a temporary file and a rename) only when rows from
//! several runs ended up out of order.

use crate::dataset::traits::{DatasetError, DatasetResult, DatasetSink};
use crate::record::{DocumentId, MetadataRecord, COLUMNS};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Append-safe CSV dataset
#[derive(Debug)]
pub struct CsvDataset {
    path: PathBuf,
    known: BTreeSet<DocumentId>,
    pending: Vec<MetadataRecord>,
    flushed_rows: usize,
}

impl CsvDataset {
    /// Opens the dataset at `path`, creating it with a header if missing
    ///
    /// An existing file is scanned so that its document IDs count as already
    /// written (resume support). An incomplete final row left by an
    /// interrupted flush is cut off; its document is harvested again.
    ///
    /// # Returns
    ///
    /// * `Ok(CsvDataset)` - Ready for appending
    /// * `Err(DatasetError)` - The file is unreadable, malformed or has a
    ///   different header
    pub fn open(path: &Path) -> DatasetResult<Self> {
        let has_content = fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);

        let mut known = BTreeSet::new();
        let mut flushed_rows = 0;

        if has_content {
            let scan = scan_dataset(path)?;
            if let Some(offset) = scan.torn_tail {
                tracing::warn!(
                    "Dataset {} ends with an incomplete row at byte {}, truncating it",
                    path.display(),
                    offset
                );
                truncate_to(path, offset)?;
            }

            for record in scan.records {
                known.insert(record.doc_id);
                flushed_rows += 1;
            }
            tracing::info!(
                "Dataset {} already holds {} rows ({} documents)",
                path.display(),
                flushed_rows,
                known.len()
            );
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|source| io_error(path, source))?;
            }
            write_rows(path, &[], false)?;
            tracing::debug!("Created dataset {}", path.display());
        }

        Ok(Self {
            path: path.to_path_buf(),
            known,
            pending: Vec::new(),
            flushed_rows,
        })
    }

    /// Path of the dataset file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of rows appended but not yet flushed
    pub fn pending_rows(&self) -> usize {
        self.pending.len()
    }

    /// Number of rows durably written so far
    pub fn flushed_rows(&self) -> usize {
        self.flushed_rows
    }
}

impl DatasetSink for CsvDataset {
    fn contains(&self, id: DocumentId) -> bool {
        self.known.contains(&id)
    }

    fn append(&mut self, record: MetadataRecord) -> DatasetResult<()> {
        self.known.insert(record.doc_id);
        self.pending.push(record);
        Ok(())
    }

    fn flush(&mut self) -> DatasetResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        append_rows(&self.path, &self.pending)?;
        self.flushed_rows += self.pending.len();
        tracing::debug!(
            "Flushed {} rows to {} ({} total)",
            self.pending.len(),
            self.path.display(),
            self.flushed_rows
        );
        self.pending.clear();
        Ok(())
    }

    fn finalize(&mut self) -> DatasetResult<usize> {
        self.flush()?;

        let records = read_dataset(&self.path)?;
        let in_order = records.windows(2).all(|w| w[0].doc_id < w[1].doc_id);
        if in_order {
            return Ok(records.len());
        }

        let mut seen = BTreeSet::new();
        let mut ordered: Vec<MetadataRecord> = records
            .into_iter()
            .filter(|record| seen.insert(record.doc_id))
            .collect();
        ordered.sort_by_key(|record| record.doc_id);

        let temp = self.path.with_extension("csv.partial");
        write_rows(&temp, &ordered, true)?;
        fs::rename(&temp, &self.path).map_err(|source| io_error(&self.path, source))?;

        tracing::info!(
            "Reordered dataset {} into {} ascending rows",
            self.path.display(),
            ordered.len()
        );
        self.flushed_rows = ordered.len();
        Ok(ordered.len())
    }
}

/// Rows of a dataset file plus the start of an incomplete final row, if any
struct DatasetScan {
    records: Vec<MetadataRecord>,
    torn_tail: Option<u64>,
}

/// Reads every row of a dataset file
///
/// # Returns
///
/// * `Ok(Vec<MetadataRecord>)` - Rows in file order
/// * `Err(DatasetError)` - Unreadable file, wrong header or malformed row
pub fn read_dataset(path: &Path) -> DatasetResult<Vec<MetadataRecord>> {
    let scan = scan_dataset(path)?;
    if scan.torn_tail.is_some() {
        return Err(DatasetError::Malformed {
            path: path.to_path_buf(),
            row: scan.records.len() as u64 + 1,
            message: "incomplete final row".to_string(),
        });
    }
    Ok(scan.records)
}

/// Reads a dataset, tolerating an incomplete final row
///
/// A row that fails to parse is only tolerated when nothing follows it, or
/// when it is the last row and the file does not end with a line break. Both
/// are what an interrupted append leaves behind. Any other bad row is an error.
fn scan_dataset(path: &Path) -> DatasetResult<DatasetScan> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| csv_error(path, source))?;

    let headers = reader
        .headers()
        .map_err(|source| csv_error(path, source))?
        .clone();
    if !header_matches(&headers) {
        return Err(DatasetError::HeaderMismatch {
            path: path.to_path_buf(),
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut records = Vec::new();
    let mut row = StringRecord::new();
    let mut last_start = None;

    loop {
        let start = reader.position().byte();
        let parsed = match reader.read_record(&mut row) {
            Ok(false) => break,
            Ok(true) => {
                MetadataRecord::from_row(row.iter()).map_err(|message| DatasetError::Malformed {
                    path: path.to_path_buf(),
                    row: records.len() as u64 + 1,
                    message,
                })
            }
            Err(source) => Err(csv_error(path, source)),
        };

        match parsed {
            Ok(record) => {
                records.push(record);
                last_start = Some(start);
            }
            Err(err) => {
                let mut next = StringRecord::new();
                return match reader.read_record(&mut next) {
                    Ok(false) => Ok(DatasetScan {
                        records,
                        torn_tail: Some(start),
                    }),
                    _ => Err(err),
                };
            }
        }
    }

    // A complete row always ends with a line break
    let torn_tail = match last_start {
        Some(start) if !ends_with_newline(path)? => {
            records.pop();
            Some(start)
        }
        _ => None,
    };

    Ok(DatasetScan { records, torn_tail })
}

fn ends_with_newline(path: &Path) -> DatasetResult<bool> {
    let mut file = File::open(path).map_err(|source| io_error(path, source))?;
    let len = file.metadata().map_err(|source| io_error(path, source))?.len();
    if len == 0 {
        return Ok(false);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))
        .and_then(|_| file.read_exact(&mut last))
        .map_err(|source| io_error(path, source))?;
    Ok(last[0] == b'\n')
}

/// Cuts the file back to `len` bytes and syncs it
fn truncate_to(path: &Path, len: u64) -> DatasetResult<()> {
    let file = OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(|source| io_error(path, source))?;
    file.set_len(len)
        .and_then(|_| file.sync_data())
        .map_err(|source| io_error(path, source))
}

fn header_matches(headers: &StringRecord) -> bool {
    headers.len() == COLUMNS.len() && headers.iter().zip(COLUMNS).all(|(a, b)| a.trim() == b)
}

/// Appends rows to an existing file and syncs it to disk
fn append_rows(path: &Path, records: &[MetadataRecord]) -> DatasetResult<()> {
    let file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|source| io_error(path, source))?;

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    for record in records {
        writer
            .write_record(record.to_row())
            .map_err(|source| csv_error(path, source))?;
    }

    sync_writer(path, writer)
}

/// Creates (or truncates) a file holding the header and the given rows
fn write_rows(path: &Path, records: &[MetadataRecord], sync: bool) -> DatasetResult<()> {
    let file = File::create(path).map_err(|source| io_error(path, source))?;

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    writer
        .write_record(COLUMNS)
        .map_err(|source| csv_error(path, source))?;
    for record in records {
        writer
            .write_record(record.to_row())
            .map_err(|source| csv_error(path, source))?;
    }

    if sync {
        sync_writer(path, writer)
    } else {
        writer.flush().map_err(|source| io_error(path, source))
    }
}

fn sync_writer(path: &Path, mut writer: csv::Writer<File>) -> DatasetResult<()> {
    writer.flush().map_err(|source| io_error(path, source))?;
    let file = writer
        .into_inner()
        .map_err(|e| io_error(path, e.into_error()))?;
    file.sync_data().map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> DatasetError {
    DatasetError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn csv_error(path: &Path, source: csv::Error) -> DatasetError {
    DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    }
}
