use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Paper-Harvest
///
/// Loaded once at start-up and never mutated afterwards; the runner shares it
/// behind an `Arc`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub fetcher: FetcherConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Which document IDs to process
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// First document ID of the range (inclusive)
    #[serde(rename = "start-id", default)]
    pub start_id: Option<u64>,

    /// Last document ID of the range (inclusive)
    #[serde(rename = "end-id", default)]
    pub end_id: Option<u64>,

    /// Optional text file listing document IDs, one per line
    #[serde(rename = "id-list", default)]
    pub id_list: Option<PathBuf>,

    /// Tab-separated column holding the document ID in the ID list
    #[serde(rename = "id-column", default)]
    pub id_column: usize,

    /// Tab-separated column holding an arXiv URL in the ID list, if any
    #[serde(rename = "url-column", default)]
    pub url_column: Option<usize>,
}

impl SourceConfig {
    /// Returns the configured inclusive range, if both bounds are set
    pub fn id_range(&self) -> Option<(u64, u64)> {
        match (self.start_id, self.end_id) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

/// Network fetch behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Abstract page URL with an `{id}` placeholder
    #[serde(rename = "abstract-url-template")]
    pub abstract_url_template: String,

    /// Minimum delay between consecutive network requests (seconds)
    #[serde(rename = "request-delay-seconds")]
    pub request_delay_seconds: f64,

    /// Retries after the first attempt for transient failures
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-seconds", default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl FetcherConfig {
    /// The rate-limit delay as a `Duration`
    pub fn request_delay(&self) -> Duration {
        Duration::from_secs_f64(self.request_delay_seconds.max(0.0))
    }

    /// The per-request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_timeout_seconds() -> u64 {
    15
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the harvester
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the harvester
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the harvester
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for harvester-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the user agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the CSV dataset
    #[serde(rename = "dataset-path")]
    pub dataset_path: PathBuf,

    /// Directory holding one cached page per document ID
    #[serde(rename = "cache-dir")]
    pub cache_dir: PathBuf,

    /// Number of written rows between dataset flushes
    #[serde(rename = "flush-interval", default = "default_flush_interval")]
    pub flush_interval: usize,

    /// Directory for the analysis report and charts
    #[serde(rename = "report-dir", default = "default_report_dir")]
    pub report_dir: PathBuf,
}

fn default_flush_interval() -> usize {
    50
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("result_analysis")
}
