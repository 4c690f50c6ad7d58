//! Metadata record definitions
//!
//! This module defines the fixed output schema of the harvester:
//! - `DocumentId`: the integer key of one paper in the corpus
//! - `DocumentTarget`: an ID paired with its abstract page URL
//! - `MetadataRecord`: the extracted fields of one abstract page
//!
//! The column order in [`COLUMNS`] is the dataset contract consumed by the
//! distribution analyzer.

mod license;

pub use license::{license_name_for, FALLBACK_LICENSE_NAME, LICENSE_MAPPINGS};

use std::fmt;

/// Dataset column names, in output order
pub const COLUMNS: [&str; 11] = [
    "doc_id",
    "abs_url",
    "license_url",
    "license_name",
    "version",
    "title",
    "authors",
    "comments",
    "subjects",
    "journal_ref",
    "related_doi",
];

/// Separator used to flatten ordered list fields into a single CSV cell
pub const LIST_SEPARATOR: &str = "; ";

/// Integer key identifying one paper in the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(pub u64);

impl DocumentId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for DocumentId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A document ID together with the abstract page it is fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTarget {
    pub id: DocumentId,
    pub abstract_url: String,
}

impl DocumentTarget {
    pub fn new(id: impl Into<DocumentId>, abstract_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            abstract_url: abstract_url.into(),
        }
    }
}

/// The structured metadata extracted from one abstract page
///
/// Every field other than `doc_id` and `abs_url` may be absent. Absent scalar
/// fields are `None`; absent list fields are empty vectors. Both are written as
/// an empty CSV cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    pub doc_id: DocumentId,
    pub abs_url: String,
    pub license_url: Option<String>,
    pub license_name: Option<String>,
    pub version: Option<u32>,
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub comments: Option<String>,
    pub subjects: Vec<String>,
    pub journal_ref: Option<String>,
    pub related_doi: Option<String>,
}

impl MetadataRecord {
    /// Creates a record with every optional field absent
    ///
    /// Used for pages that could not be fetched so that every requested ID
    /// still produces exactly one row.
    pub fn absent(target: &DocumentTarget) -> Self {
        Self {
            doc_id: target.id,
            abs_url: target.abstract_url.clone(),
            license_url: None,
            license_name: None,
            version: None,
            title: None,
            authors: Vec::new(),
            comments: None,
            subjects: Vec::new(),
            journal_ref: None,
            related_doi: None,
        }
    }

    /// Returns true if no optional field is present
    pub fn is_empty(&self) -> bool {
        self.license_url.is_none()
            && self.license_name.is_none()
            && self.version.is_none()
            && self.title.is_none()
            && self.authors.is_empty()
            && self.comments.is_none()
            && self.subjects.is_empty()
            && self.journal_ref.is_none()
            && self.related_doi.is_none()
    }

    /// Flattens the record into CSV cells in [`COLUMNS`] order
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.doc_id.to_string(),
            self.abs_url.clone(),
            self.license_url.clone().unwrap_or_default(),
            self.license_name.clone().unwrap_or_default(),
            self.version.map(|v| v.to_string()).unwrap_or_default(),
            self.title.clone().unwrap_or_default(),
            self.authors.join(LIST_SEPARATOR),
            self.comments.clone().unwrap_or_default(),
            self.subjects.join(LIST_SEPARATOR),
            self.journal_ref.clone().unwrap_or_default(),
            self.related_doi.clone().unwrap_or_default(),
        ]
    }

    /// Rebuilds a record from CSV cells in [`COLUMNS`] order
    ///
    /// # Returns
    ///
    /// * `Ok(MetadataRecord)` - The parsed record
    /// * `Err(String)` - Description of the malformed cell
    pub fn from_row<'a, I>(cells: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let cells: Vec<&str> = cells.into_iter().collect();
        if cells.len() != COLUMNS.len() {
            return Err(format!(
                "expected {} columns, found {}",
                COLUMNS.len(),
                cells.len()
            ));
        }

        let doc_id = cells[0]
            .trim()
            .parse::<u64>()
            .map_err(|e| format!("invalid doc_id '{}': {}", cells[0], e))?;

        let version = match cells[4].trim() {
            "" => None,
            raw => Some(
                raw.trim_start_matches('v')
                    .parse::<u32>()
                    .map_err(|e| format!("invalid version '{}': {}", raw, e))?,
            ),
        };

        Ok(Self {
            doc_id: DocumentId(doc_id),
            abs_url: cells[1].to_string(),
            license_url: present(cells[2]),
            license_name: present(cells[3]),
            version,
            title: present(cells[5]),
            authors: split_list(cells[6]),
            comments: present(cells[7]),
            subjects: split_list(cells[8]),
            journal_ref: present(cells[9]),
            related_doi: present(cells[10]),
        })
    }
}

/// Maps an empty cell to `None`
fn present(cell: &str) -> Option<String> {
    if cell.is_empty() {
        None
    } else {
        Some(cell.to_string())
    }
}

fn split_list(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }
    cell.split(LIST_SEPARATOR.trim())
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
