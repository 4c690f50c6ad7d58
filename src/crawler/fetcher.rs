//! HTTP fetcher implementation
//!
//! This module handles all page retrieval for the harvester, including:
//! - Building HTTP clients with proper user agent strings
//! - Serving pages from the local page cache
//! - Rate limiting through the `Throttle`
//! - Retry logic for transient failures
//! - Error classification into fetch statuses

use crate::config::{FetcherConfig, UserAgentConfig};
use crate::crawler::throttle::Throttle;
use crate::record::DocumentTarget;
use crate::storage::{CacheError, PageCache};
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};

/// Outcome class of a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchStatus {
    /// Page content is available (from cache or network)
    Success,

    /// The server answered 404 or 410
    NotFound,

    /// Transient failures exhausted their retries, or a non-retryable error
    ServerError,

    /// The page was received but its body is not usable text
    ParseFailure,
}

impl FetchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NotFound => "not_found",
            Self::ServerError => "server_error",
            Self::ParseFailure => "parse_failure",
        }
    }
}

/// Result of fetching one abstract page
#[derive(Debug, Clone)]
pub struct RawPage {
    /// Outcome of the fetch
    pub status: FetchStatus,

    /// Page body, present only for `Success`
    pub content: Option<String>,

    /// True when served from the page cache
    pub from_cache: bool,

    /// Number of network requests issued for this page
    pub attempts: u32,

    /// Last HTTP status code seen, if any
    pub http_status: Option<u16>,
}

impl RawPage {
    fn cached(content: String) -> Self {
        Self {
            status: FetchStatus::Success,
            content: Some(content),
            from_cache: true,
            attempts: 0,
            http_status: None,
        }
    }

    fn failed(status: FetchStatus, attempts: u32, http_status: Option<u16>) -> Self {
        Self {
            status,
            content: None,
            from_cache: false,
            attempts,
            http_status,
        }
    }
}

/// Classification of a single network attempt
#[derive(Debug)]
enum Attempt {
    /// 2xx with a UTF-8 body
    Page { status_code: u16, body: String },

    /// 404 / 410
    NotFound { status_code: u16 },

    /// Worth retrying: timeout, connection error, 5xx, 408, 429
    Transient {
        status_code: Option<u16>,
        error: String,
    },

    /// Not worth retrying: other 4xx, malformed request
    Permanent {
        status_code: Option<u16>,
        error: String,
    },

    /// 2xx whose body is not valid UTF-8
    Undecodable { status_code: u16 },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use paper_harvest::config::UserAgentConfig;
/// use paper_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "Academic-Research-Bot".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://institution.edu/bot".to_string(),
///     contact_email: "researcher@institution.edu".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(15)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Retrieves abstract pages, cache first, network second
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | Cached | Return cached page, no request, no delay |
/// | HTTP 2xx | Cache, then Success |
/// | HTTP 404 / 410 | Immediate → NotFound |
/// | HTTP 5xx / 408 / 429 | Retry up to `max-retries` times |
/// | Timeout / connection error | Retry up to `max-retries` times |
/// | Other HTTP 4xx | Immediate → ServerError |
/// | Body not UTF-8 | Immediate → ParseFailure |
///
/// Every network attempt, retries included, waits on the throttle first.
pub struct PageFetcher<C: PageCache> {
    client: Client,
    cache: C,
    throttle: Throttle,
    max_retries: u32,
    network_requests: u64,
}

impl<C: PageCache> PageFetcher<C> {
    /// Creates a fetcher around an HTTP client and a page cache
    pub fn new(client: Client, cache: C, config: &FetcherConfig) -> Self {
        Self {
            client,
            cache,
            throttle: Throttle::new(config.request_delay()),
            max_retries: config.max_retries,
            network_requests: 0,
        }
    }

    /// The page cache this fetcher reads and writes
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Total network requests issued so far
    pub fn network_requests(&self) -> u64 {
        self.network_requests
    }

    /// Fetches the abstract page for `target`
    ///
    /// Network and content problems are reported through [`FetchStatus`];
    /// only page cache failures are returned as errors, because they mean
    /// the run can no longer make durable progress.
    pub async fn fetch(&mut self, target: &DocumentTarget) -> Result<RawPage, CacheError> {
        let id = target.id;

        if self.cache.has(id) {
            match self.cache.get(id) {
                Ok(content) => {
                    tracing::debug!("Document {}: served from cache", id);
                    return Ok(RawPage::cached(content));
                }
                Err(CacheError::Miss(_)) => {
                    tracing::debug!("Document {}: cache entry vanished, fetching", id);
                }
                Err(CacheError::Corrupt { path, .. }) => {
                    tracing::warn!(
                        "Document {}: cached page {} is not valid UTF-8",
                        id,
                        path.display()
                    );
                    return Ok(RawPage::failed(FetchStatus::ParseFailure, 0, None));
                }
                Err(e) => return Err(e),
            }
        }

        let max_attempts = self.max_retries + 1;
        let mut last_status = None;

        for attempt in 1..=max_attempts {
            self.throttle.wait().await;

            tracing::debug!(
                "Document {}: GET {} (attempt {}/{})",
                id,
                target.abstract_url,
                attempt,
                max_attempts
            );
            let outcome = self.send(&target.abstract_url).await;
            self.throttle.record_request_end(Instant::now());
            self.network_requests += 1;

            match outcome {
                Attempt::Page { status_code, body } => {
                    self.cache.put(id, &body)?;
                    return Ok(RawPage {
                        status: FetchStatus::Success,
                        content: Some(body),
                        from_cache: false,
                        attempts: attempt,
                        http_status: Some(status_code),
                    });
                }
                Attempt::NotFound { status_code } => {
                    tracing::warn!(
                        "Document {}: {} returned HTTP {}",
                        id,
                        target.abstract_url,
                        status_code
                    );
                    return Ok(RawPage::failed(
                        FetchStatus::NotFound,
                        attempt,
                        Some(status_code),
                    ));
                }
                Attempt::Undecodable { status_code } => {
                    tracing::warn!(
                        "Document {}: body of {} is not valid UTF-8",
                        id,
                        target.abstract_url
                    );
                    return Ok(RawPage::failed(
                        FetchStatus::ParseFailure,
                        attempt,
                        Some(status_code),
                    ));
                }
                Attempt::Permanent { status_code, error } => {
                    tracing::warn!(
                        "Document {}: giving up on {}: {}",
                        id,
                        target.abstract_url,
                        error
                    );
                    return Ok(RawPage::failed(
                        FetchStatus::ServerError,
                        attempt,
                        status_code,
                    ));
                }
                Attempt::Transient { status_code, error } => {
                    last_status = status_code.or(last_status);
                    if attempt < max_attempts {
                        tracing::debug!(
                            "Document {}: transient failure ({}), retrying",
                            id,
                            error
                        );
                    } else {
                        tracing::warn!(
                            "Document {}: {} failed after {} attempts: {}",
                            id,
                            target.abstract_url,
                            attempt,
                            error
                        );
                    }
                }
            }
        }

        Ok(RawPage::failed(
            FetchStatus::ServerError,
            max_attempts,
            last_status,
        ))
    }

    /// Issues one GET request and classifies the result
    async fn send(&self, url: &str) -> Attempt {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return classify_request_error(e),
        };

        let status = response.status();
        let status_code = status.as_u16();

        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Attempt::NotFound { status_code };
        }

        if status.is_server_error()
            || status == StatusCode::REQUEST_TIMEOUT
            || status == StatusCode::TOO_MANY_REQUESTS
        {
            return Attempt::Transient {
                status_code: Some(status_code),
                error: format!("HTTP {}", status_code),
            };
        }

        if !status.is_success() {
            return Attempt::Permanent {
                status_code: Some(status_code),
                error: format!("HTTP {}", status_code),
            };
        }

        match response.bytes().await {
            Ok(bytes) => match String::from_utf8(bytes.to_vec()) {
                Ok(body) => Attempt::Page { status_code, body },
                Err(_) => Attempt::Undecodable { status_code },
            },
            Err(e) => Attempt::Transient {
                status_code: Some(status_code),
                error: format!("Failed to read body: {}", e),
            },
        }
    }
}

/// Classifies a request-level error (no response received)
fn classify_request_error(e: reqwest::Error) -> Attempt {
    if e.is_timeout() {
        Attempt::Transient {
            status_code: None,
            error: "Request timeout".to_string(),
        }
    } else if e.is_connect() {
        Attempt::Transient {
            status_code: None,
            error: "Connection failed".to_string(),
        }
    } else if e.is_builder() {
        Attempt::Permanent {
            status_code: None,
            error: e.to_string(),
        }
    } else {
        Attempt::Transient {
            status_code: None,
            error: e.to_string(),
        }
    }
}
