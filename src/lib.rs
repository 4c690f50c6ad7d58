//! Paper-Harvest: a polite abstract-page metadata harvester
//!
//! This crate walks a numbered corpus of remote abstract pages, caches the raw
//! pages on disk, extracts a fixed metadata schema (license, version, title,
//! authors, subjects, ...) and writes the results as a CSV dataset. A second
//! stage reads that dataset back and reports license and version distributions.

pub mod config;
pub mod crawler;
pub mod dataset;
pub mod output;
pub mod record;
pub mod source;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Paper-Harvest operations
///
/// Only storage-layer failures (cache or dataset) and setup failures surface
/// here; per-document network and parse failures are folded into the record.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Page cache error: {0}")]
    Cache(#[from] storage::CacheError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] dataset::DatasetError),

    #[error("Document source error: {0}")]
    Source(#[from] source::SourceError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] output::AnalysisError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid state transition for document {id}: {from:?} -> {to:?}")]
    InvalidTransition {
        id: u64,
        from: state::IdState,
        to: state::IdState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Paper-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{DocumentId, DocumentTarget, MetadataRecord};
pub use state::IdState;
