//! Field extraction from abstract pages
//!
//! The `FieldExtractor` turns a fetched page into a `MetadataRecord` by running
//! each rule in [`rules`] over the parsed document. Extraction never fails:
//! a page that could not be fetched, or a field that is missing, simply leaves
//! the corresponding record fields absent.

pub mod rules;

use crate::crawler::fetcher::{FetchStatus, RawPage};
use crate::record::{license_name_for, DocumentTarget, MetadataRecord};
use scraper::Html;

/// Composes the field rules into a record builder
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldExtractor;

impl FieldExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Builds the record for `target` from a fetched page
    ///
    /// # Arguments
    ///
    /// * `target` - The document the page belongs to
    /// * `raw` - The fetch result
    ///
    /// # Returns
    ///
    /// A record with `doc_id` and `abs_url` always set. Non-`Success` pages
    /// produce a record with every other field absent.
    pub fn extract(&self, target: &DocumentTarget, raw: &RawPage) -> MetadataRecord {
        let mut record = MetadataRecord::absent(target);

        let content = match (raw.status, raw.content.as_deref()) {
            (FetchStatus::Success, Some(content)) => content,
            _ => return record,
        };

        let document = Html::parse_document(content);

        record.license_url = rules::license_url(&document, &target.abstract_url);
        record.license_name = record
            .license_url
            .as_deref()
            .and_then(license_name_for)
            .map(str::to_string);
        record.version = rules::version(&document);
        record.title = rules::title(&document);
        record.authors = rules::authors(&document);
        record.comments = rules::comments(&document);
        record.subjects = rules::subjects(&document);
        record.journal_ref = rules::journal_ref(&document);
        record.related_doi = rules::related_doi(&document);

        if record.is_empty() {
            tracing::warn!(
                "Document {}: page structure not recognized, no fields extracted",
                target.id
            );
        }

        record
    }
}
