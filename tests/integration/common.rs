//! Shared fixtures for the integration tests

use paper_harvest::config::{Config, FetcherConfig, OutputConfig, SourceConfig, UserAgentConfig};
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds an abstract page carrying a license link and `version` history markers
pub fn abstract_page(id: u64, version: u32) -> String {
    let history: String = (1..=version)
        .rev()
        .map(|v| format!("<strong>[v{}]</strong> submitted\n", v))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>[{id}] Paper {id}</title></head>
<body>
  <h1 class="title mathjax"><span class="descriptor">Title:</span> Paper number {id}</h1>
  <div class="authors"><span class="descriptor">Authors:</span>
    <a href="/a/one">Author One</a>, <a href="/a/two">Author Two</a>
  </div>
  <table>
    <tr><td class="tablecell subjects">High Energy Physics - Theory (hep-th)</td></tr>
  </table>
  <div class="submission-history">{history}</div>
  <a rel="license" href="http://creativecommons.org/licenses/by/4.0/">CC BY 4.0</a>
</body>
</html>"#,
        id = id,
        history = history
    )
}

/// Creates a test configuration pointing at the mock server
pub fn create_test_config(server_uri: &str, dir: &Path, start: u64, end: u64) -> Config {
    Config {
        source: SourceConfig {
            start_id: Some(start),
            end_id: Some(end),
            id_list: None,
            id_column: 0,
            url_column: None,
        },
        fetcher: FetcherConfig {
            abstract_url_template: format!("{}/abs/{{id}}", server_uri),
            request_delay_seconds: 0.0,
            max_retries: 2,
            timeout_seconds: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestHarvester".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            dataset_path: dir.join("metadata.csv"),
            cache_dir: dir.join("pages"),
            flush_interval: 3,
            report_dir: dir.join("result_analysis"),
        },
    }
}

/// Serves `abstract_page(id, (id % 3) + 1)` for every ID in the range
pub async fn mount_pages(server: &MockServer, ids: impl IntoIterator<Item = u64>) {
    for id in ids {
        Mock::given(method("GET"))
            .and(path(format!("/abs/{}", id)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(abstract_page(id, (id % 3) as u32 + 1))
                    .insert_header("content-type", "text/html; charset=utf-8"),
            )
            .mount(server)
            .await;
    }
}

/// Number of requests the server received for one path
pub async fn requests_for(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == request_path)
        .count()
}
