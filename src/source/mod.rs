//! Document source module
//!
//! This module turns the `[source]` configuration into an ordered extraction
//! plan: a list of `DocumentTarget`s sorted by ascending document ID with no
//! duplicates. IDs come from an inclusive range, from an ID list file, or from
//! an ID list filtered to a range.

mod arxiv;
mod ids;

pub use arxiv::{normalize_arxiv_url, render_abstract_url};
pub use ids::{extract_numeric_id, parse_id_list, ListEntry};

use crate::config::{FetcherConfig, SourceConfig};
use crate::record::DocumentTarget;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the document source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read ID list {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Builds the extraction plan from configuration
///
/// # Arguments
///
/// * `source` - Range and/or ID list settings
/// * `fetcher` - Supplies the abstract URL template
///
/// # Returns
///
/// * `Ok(Vec<DocumentTarget>)` - Targets in ascending ID order, unique by ID
/// * `Err(SourceError)` - The ID list could not be read
pub fn build_plan(
    source: &SourceConfig,
    fetcher: &FetcherConfig,
) -> Result<Vec<DocumentTarget>, SourceError> {
    let template = fetcher.abstract_url_template.as_str();
    let range = source.id_range();

    let Some(list_path) = &source.id_list else {
        // Validation guarantees a range when no list is configured
        let (start, end) = range.unwrap_or((1, 0));
        return Ok((start..=end)
            .map(|id| DocumentTarget::new(id, render_abstract_url(template, id)))
            .collect());
    };

    let content = std::fs::read_to_string(list_path).map_err(|source| SourceError::Io {
        path: list_path.clone(),
        source,
    })?;

    let entries = parse_id_list(&content, source.id_column, source.url_column);
    tracing::debug!(
        "Loaded {} entries from ID list {}",
        entries.len(),
        list_path.display()
    );

    Ok(plan_from_entries(entries, range, template))
}

/// Orders, filters and de-duplicates ID list entries into targets
fn plan_from_entries(
    entries: Vec<ListEntry>,
    range: Option<(u64, u64)>,
    template: &str,
) -> Vec<DocumentTarget> {
    let mut targets: BTreeMap<u64, DocumentTarget> = BTreeMap::new();

    for entry in entries {
        if let Some((start, end)) = range {
            if entry.id < start || entry.id > end {
                continue;
            }
        }

        if targets.contains_key(&entry.id) {
            tracing::warn!("Document {} listed more than once, keeping first", entry.id);
            continue;
        }

        let abstract_url = match entry.url.as_deref() {
            Some(raw) => normalize_arxiv_url(raw).unwrap_or_else(|| {
                tracing::warn!(
                    "Document {}: unrecognized abstract URL '{}', using template",
                    entry.id,
                    raw
                );
                render_abstract_url(template, entry.id)
            }),
            None => render_abstract_url(template, entry.id),
        };

        targets.insert(entry.id, DocumentTarget::new(entry.id, abstract_url));
    }

    targets.into_values().collect()
}
