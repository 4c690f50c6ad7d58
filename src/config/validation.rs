use crate::config::types::{Config, FetcherConfig, OutputConfig, SourceConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on retries; anything larger only hammers a failing server
const MAX_RETRIES_LIMIT: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the document source: a full range, an ID list, or both
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    match (config.start_id, config.end_id) {
        (Some(start), Some(end)) if start > end => {
            return Err(ConfigError::Validation(format!(
                "start-id ({}) must not exceed end-id ({})",
                start, end
            )));
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(ConfigError::Validation(
                "start-id and end-id must be set together".to_string(),
            ));
        }
        _ => {}
    }

    if config.id_range().is_none() && config.id_list.is_none() {
        return Err(ConfigError::Validation(
            "source needs either start-id/end-id or id-list".to_string(),
        ));
    }

    if let Some(list) = &config.id_list {
        if list.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "id-list cannot be empty".to_string(),
            ));
        }
    }

    if config.url_column == Some(config.id_column) {
        return Err(ConfigError::Validation(format!(
            "url-column and id-column must differ, both are {}",
            config.id_column
        )));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if !config.abstract_url_template.contains("{id}") {
        return Err(ConfigError::Validation(format!(
            "abstract-url-template must contain '{{id}}', got '{}'",
            config.abstract_url_template
        )));
    }

    let sample = config.abstract_url_template.replace("{id}", "1");
    let url = Url::parse(&sample).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid abstract-url-template '{}': {}",
            config.abstract_url_template, e
        ))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "abstract-url-template must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if !config.request_delay_seconds.is_finite() || config.request_delay_seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "request-delay-seconds must be a non-negative number, got {}",
            config.request_delay_seconds
        )));
    }

    if config.max_retries > MAX_RETRIES_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-retries must be <= {}, got {}",
            MAX_RETRIES_LIMIT, config.max_retries
        )));
    }

    if config.timeout_seconds < 1 {
        return Err(ConfigError::Validation(
            "timeout-seconds must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.dataset_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "dataset-path cannot be empty".to_string(),
        ));
    }

    if config.cache_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "cache-dir cannot be empty".to_string(),
        ));
    }

    if config.report_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "report-dir cannot be empty".to_string(),
        ));
    }

    if config.flush_interval < 1 {
        return Err(ConfigError::Validation(
            "flush-interval must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| ConfigError::Validation(format!("Invalid email format: '{}'", email)))?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
