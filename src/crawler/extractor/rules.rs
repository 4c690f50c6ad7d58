//! Field extraction rules
//!
//! Each rule reads one field from a parsed abstract page and returns `None`
//! when the field is not present. Rules are independent of each other; the
//! `FieldExtractor` composes them into a `MetadataRecord`.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

// ===== Regular expressions =====

/// `[v3]` style markers in the submission history
fn history_version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[v(\d+)\]").expect("valid version regex"))
}

/// `1234v3` style suffixes in the canonical page URL
fn url_version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\dv(\d+)").expect("valid version regex"))
}

// ===== Helpers =====

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the collapsed text of an element, or None if it is empty
fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = collapse_whitespace(&element.text().collect::<String>());
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Returns the collapsed text of the first element matching `selector`
fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next().and_then(element_text)
}

/// Removes verbatim duplicates while keeping the first occurrence in place
fn dedup_in_order(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Resolves an href against the page URL
///
/// Protocol-relative targets (`//host/path`) get `https:`; other relative
/// targets are joined onto the page URL. Returns None for empty hrefs or when
/// a relative href cannot be resolved.
pub fn resolve_href(href: &str, page_url: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    if let Some(rest) = href.strip_prefix("//") {
        return Some(format!("https://{}", rest));
    }

    if let Ok(absolute) = Url::parse(href) {
        return Some(absolute.to_string());
    }

    let base = Url::parse(page_url).ok()?;
    base.join(href).ok().map(|url| url.to_string())
}

// ===== Rules =====

/// License link: `a[rel="license"]` first, then any link into `/licenses/`
pub fn license_url(document: &Html, page_url: &str) -> Option<String> {
    let rel_selector = Selector::parse(r#"a[rel="license"][href]"#).ok()?;
    let href = document
        .select(&rel_selector)
        .filter_map(|element| element.value().attr("href"))
        .find(|href| !href.trim().is_empty())
        .or_else(|| {
            let any_selector = Selector::parse("a[href]").ok()?;
            document
                .select(&any_selector)
                .filter_map(|element| element.value().attr("href"))
                .find(|href| href.contains("/licenses/"))
        })?;

    resolve_href(href, page_url)
}

/// Highest version number on the page
///
/// Looks at `[vN]` markers in the submission history first and falls back to
/// the `og:url` meta tag. Zero is never a valid version.
pub fn version(document: &Html) -> Option<u32> {
    let history = first_text(document, "div.submission-history")
        .and_then(|text| max_version(history_version_pattern(), &text));
    if history.is_some() {
        return history;
    }

    let meta_selector = Selector::parse(r#"meta[property="og:url"]"#).ok()?;
    document
        .select(&meta_selector)
        .filter_map(|element| element.value().attr("content"))
        .filter_map(|content| max_version(url_version_pattern(), content))
        .max()
}

fn max_version(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures_iter(text)
        .filter_map(|captures| captures.get(1)?.as_str().parse::<u32>().ok())
        .filter(|version| *version > 0)
        .max()
}

/// Paper title without the `Title:` label
pub fn title(document: &Html) -> Option<String> {
    let text = first_text(document, "h1.title")?;
    let stripped = match text.get(..6) {
        Some(prefix) if prefix.eq_ignore_ascii_case("title:") => {
            text[6..].trim().to_string()
        }
        _ => text,
    };

    if stripped.is_empty() {
        None
    } else {
        Some(stripped)
    }
}

/// Author names in page order
pub fn authors(document: &Html) -> Vec<String> {
    let (Ok(block_selector), Ok(link_selector)) =
        (Selector::parse("div.authors"), Selector::parse("a"))
    else {
        return Vec::new();
    };

    let Some(block) = document.select(&block_selector).next() else {
        return Vec::new();
    };

    dedup_in_order(block.select(&link_selector).filter_map(element_text))
}

/// Free-text comments line
pub fn comments(document: &Html) -> Option<String> {
    first_text(document, "td.comments")
}

/// Journal reference line
pub fn journal_ref(document: &Html) -> Option<String> {
    first_text(document, "td.jref")
}

/// Subject classifications in page order
pub fn subjects(document: &Html) -> Vec<String> {
    let Some(text) = first_text(document, "td.subjects") else {
        return Vec::new();
    };

    dedup_in_order(
        text.split(';')
            .map(|subject| subject.trim().to_string())
            .filter(|subject| !subject.is_empty()),
    )
}

/// DOI of the published version
pub fn related_doi(document: &Html) -> Option<String> {
    let cell_selector = Selector::parse("td.doi").ok()?;
    let link_selector = Selector::parse("a").ok()?;

    let cell = document.select(&cell_selector).next()?;
    cell.select(&link_selector).next().and_then(element_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://arxiv.org/abs/1234.5678";

    fn doc(body: &str) -> Html {
        Html::parse_document(&format!("<html><head></head><body>{}</body></html>", body))
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  c "), "a b c");
        assert_eq!(collapse_whitespace(" \n "), "");
    }

    #[test]
    fn test_resolve_href() {
        assert_eq!(
            resolve_href("//creativecommons.org/licenses/by/4.0/", PAGE_URL).as_deref(),
            Some("https://creativecommons.org/licenses/by/4.0/")
        );
        assert_eq!(
            resolve_href("/licenses/nonexclusive-distrib/1.0/", PAGE_URL).as_deref(),
            Some("https://arxiv.org/licenses/nonexclusive-distrib/1.0/")
        );
        assert_eq!(resolve_href("   ", PAGE_URL), None);
    }

    #[test]
    fn test_license_url_prefers_rel_license() {
        let document = doc(
            r#"<a href="http://arxiv.org/licenses/nonexclusive-distrib/1.0/">other</a>
               <a rel="license" href="http://creativecommons.org/licenses/by/4.0/">CC</a>"#,
        );
        assert_eq!(
            license_url(&document, PAGE_URL).as_deref(),
            Some("http://creativecommons.org/licenses/by/4.0/")
        );
    }

    #[test]
    fn test_license_url_falls_back_to_licenses_path() {
        let document = doc(
            r#"<a href="/help">help</a>
               <a href="/licenses/nonexclusive-distrib/1.0/">license</a>"#,
        );
        assert_eq!(
            license_url(&document, PAGE_URL).as_deref(),
            Some("https://arxiv.org/licenses/nonexclusive-distrib/1.0/")
        );
    }

    #[test]
    fn test_license_url_absent() {
        assert_eq!(license_url(&doc("<a href='/help'>help</a>"), PAGE_URL), None);
    }

    #[test]
    fn test_version_takes_maximum_in_any_order() {
        for history in [
            "[v1] Mon [v2] Tue [v3] Wed",
            "[v3] Wed [v1] Mon [v2] Tue",
            "[v2] Tue [v3] Wed [v1] Mon",
        ] {
            let document = doc(&format!(r#"<div class="submission-history">{}</div>"#, history));
            assert_eq!(version(&document), Some(3), "history: {}", history);
        }
    }

    #[test]
    fn test_version_ignores_zero() {
        let document = doc(r#"<div class="submission-history">[v0] draft</div>"#);
        assert_eq!(version(&document), None);
    }

    #[test]
    fn test_version_falls_back_to_og_url() {
        let document = Html::parse_document(
            r#"<html><head>
               <meta property="og:url" content="https://arxiv.org/abs/1234.5678v4">
               </head><body></body></html>"#,
        );
        assert_eq!(version(&document), Some(4));
    }

    #[test]
    fn test_title_strips_label() {
        let document = doc(
            r#"<h1 class="title mathjax"><span class="descriptor">Title:</span>
               Attention   Is All
               You Need</h1>"#,
        );
        assert_eq!(title(&document).as_deref(), Some("Attention Is All You Need"));
    }

    #[test]
    fn test_title_label_only_is_absent() {
        assert_eq!(title(&doc(r#"<h1 class="title">Title:</h1>"#)), None);
    }

    #[test]
    fn test_authors_in_order_without_duplicates() {
        let document = doc(
            r#"<div class="authors"><span class="descriptor">Authors:</span>
               <a href="/a/x">Ada Lovelace</a>, <a href="/a/y">Alan Turing</a>,
               <a href="/a/x">Ada Lovelace</a></div>"#,
        );
        assert_eq!(authors(&document), vec!["Ada Lovelace", "Alan Turing"]);
    }

    #[test]
    fn test_subjects_split_and_trimmed() {
        let document = doc(
            r#"<table><tr><td class="tablecell subjects">
               <span class="primary-subject">Computation and Language (cs.CL)</span>;
               Machine Learning (cs.LG); Computation and Language (cs.CL)</td></tr></table>"#,
        );
        assert_eq!(
            subjects(&document),
            vec!["Computation and Language (cs.CL)", "Machine Learning (cs.LG)"]
        );
    }

    #[test]
    fn test_table_cells() {
        let document = doc(
            r#"<table>
               <tr><td class="tablecell comments">15 pages, 5 figures</td></tr>
               <tr><td class="tablecell jref">Phys. Rev. D 1, 2 (2001)</td></tr>
               <tr><td class="tablecell doi"><a href="https://doi.org/10.1/x">10.1/x</a></td></tr>
               </table>"#,
        );
        assert_eq!(comments(&document).as_deref(), Some("15 pages, 5 figures"));
        assert_eq!(journal_ref(&document).as_deref(), Some("Phys. Rev. D 1, 2 (2001)"));
        assert_eq!(related_doi(&document).as_deref(), Some("10.1/x"));
    }

    #[test]
    fn test_missing_cells_are_absent() {
        let document = doc("<p>nothing here</p>");
        assert_eq!(comments(&document), None);
        assert_eq!(journal_ref(&document), None);
        assert_eq!(related_doi(&document), None);
        assert!(subjects(&document).is_empty());
        assert!(authors(&document).is_empty());
    }
}
