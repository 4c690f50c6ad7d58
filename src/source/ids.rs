//! Document ID parsing and ID-list loading

use regex::Regex;
use std::sync::OnceLock;

/// One usable line of an ID list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Numeric document ID recovered from the ID column
    pub id: u64,
    /// Raw URL cell, when a URL column is configured and non-empty
    pub url: Option<String>,
}

/// Recovers the numeric document ID from an ID cell
///
/// Accepts, in order:
/// 1. `PN0`-prefixed IDs (`PN0123456` → 123456)
/// 2. Plain integers
/// 3. Mixed strings, using the last run of digits
///
/// # Examples
///
/// ```
/// use paper_harvest::source::extract_numeric_id;
///
/// assert_eq!(extract_numeric_id("PN0061000"), Some(61000));
/// assert_eq!(extract_numeric_id("61000"), Some(61000));
/// assert_eq!(extract_numeric_id("doc-12-b-345"), Some(345));
/// assert_eq!(extract_numeric_id("none"), None);
/// ```
pub fn extract_numeric_id(raw: &str) -> Option<u64> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();

    let raw = raw.trim();

    if let Some(rest) = raw.strip_prefix("PN0") {
        if let Ok(id) = rest.parse::<u64>() {
            return Some(id);
        }
    }

    if let Ok(id) = raw.parse::<u64>() {
        return Some(id);
    }

    let digits = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("digit pattern is valid"));
    digits
        .find_iter(raw)
        .last()
        .and_then(|m| m.as_str().parse::<u64>().ok())
}

/// Parses the content of an ID list
///
/// Lines are split on tabs. Blank lines and `#` comments are ignored; lines
/// whose ID cell yields no number are skipped with a warning.
///
/// # Arguments
///
/// * `content` - The whole ID list file
/// * `id_column` - Column holding the document ID
/// * `url_column` - Optional column holding an abstract URL
pub fn parse_id_list(content: &str, id_column: usize, url_column: Option<usize>) -> Vec<ListEntry> {
    let mut entries = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let cells: Vec<&str> = line.split('\t').collect();

        let Some(id_cell) = cells.get(id_column) else {
            tracing::warn!(
                "ID list line {} has no column {}, skipping",
                line_no + 1,
                id_column
            );
            continue;
        };

        let Some(id) = extract_numeric_id(id_cell) else {
            tracing::warn!(
                "ID list line {}: no document ID in '{}', skipping",
                line_no + 1,
                id_cell.trim()
            );
            continue;
        };

        let url = url_column
            .and_then(|column| cells.get(column))
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
            .map(str::to_string);

        entries.push(ListEntry { id, url });
    }

    entries
}
