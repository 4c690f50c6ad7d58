//! Abstract URL resolution

use regex::Regex;
use std::sync::OnceLock;

/// Canonical host for normalized arXiv abstract URLs
const ARXIV_ABS_BASE: &str = "https://arxiv.org/abs/";

/// Converts the various arXiv URL forms into the canonical abstract page URL
///
/// Handles `abs/` and `pdf/` paths, `.pdf` suffixes, optional `vN` suffixes,
/// bare `arxiv.org/<id>` links and legacy `archive/NNNNNNN` identifiers. The
/// version suffix is kept when present.
///
/// # Examples
///
/// ```
/// use paper_harvest::source::normalize_arxiv_url;
///
/// assert_eq!(
///     normalize_arxiv_url("http://arxiv.org/pdf/1810.04805v2.pdf").as_deref(),
///     Some("https://arxiv.org/abs/1810.04805v2")
/// );
/// assert_eq!(normalize_arxiv_url("https://example.com/paper"), None);
/// ```
pub fn normalize_arxiv_url(raw: &str) -> Option<String> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

    let patterns = PATTERNS.get_or_init(|| {
        [
            r"arxiv\.org/(?:abs|pdf)/([a-z\-]+(?:\.[A-Z]{2})?/\d{7}(?:v\d+)?)",
            r"arxiv\.org/(?:abs|pdf)/(\d{4}\.\d{4,5}(?:v\d+)?)",
            r"arxiv\.org/(\d{4}\.\d{4,5}(?:v\d+)?)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("arXiv pattern is valid"))
        .collect()
    });

    let cleaned = raw.trim().replace(".pdf", "");
    if cleaned.is_empty() {
        return None;
    }

    patterns
        .iter()
        .find_map(|pattern| pattern.captures(&cleaned))
        .and_then(|captures| captures.get(1))
        .map(|paper_id| format!("{}{}", ARXIV_ABS_BASE, paper_id.as_str()))
}

/// Fills the `{id}` placeholder of an abstract URL template
pub fn render_abstract_url(template: &str, id: u64) -> String {
    template.replace("{id}", &id.to_string())
}
