//! License URL to license name lookup

/// Known license URL fragments and their normalized names
///
/// Matching is a substring test against the lower-cased license URL, so
/// scheme, `www.` and trailing slashes do not matter.
pub const LICENSE_MAPPINGS: &[(&str, &str)] = &[
    ("creativecommons.org/licenses/by/4.0", "CC BY 4.0"),
    ("creativecommons.org/licenses/by-sa/4.0", "CC BY-SA 4.0"),
    ("creativecommons.org/licenses/by-nc-sa/4.0", "CC BY-NC-SA 4.0"),
    ("creativecommons.org/licenses/by-nc-nd/4.0", "CC BY-NC-ND 4.0"),
    (
        "arxiv.org/licenses/nonexclusive-distrib/1.0",
        "arXiv Non-exclusive",
    ),
    (
        "arxiv.org/licenses/assumed-1991-2003",
        "arXiv Assumed (1991-2003)",
    ),
];

/// Name given to license URLs that match no entry of the table
pub const FALLBACK_LICENSE_NAME: &str = "Other/Unmapped";

/// Maps a license URL to its normalized name
///
/// # Returns
///
/// * `None` - The URL is empty
/// * `Some(name)` - The table entry, or [`FALLBACK_LICENSE_NAME`]
pub fn license_name_for(license_url: &str) -> Option<&'static str> {
    let url = license_url.trim().to_lowercase();
    if url.is_empty() {
        return None;
    }

    let name = LICENSE_MAPPINGS
        .iter()
        .find(|(pattern, _)| url.contains(pattern))
        .map(|(_, name)| *name)
        .unwrap_or(FALLBACK_LICENSE_NAME);

    Some(name)
}
