//! Crawler module for abstract page harvesting
//!
//! This module contains the core extraction pipeline, including:
//! - Request throttling between network requests
//! - Cache-first HTTP fetching with retry logic
//! - Field extraction from abstract pages
//! - Overall run coordination

pub mod extractor;
mod fetcher;
mod runner;
mod throttle;

pub use extractor::FieldExtractor;
pub use fetcher::{build_http_client, FetchStatus, PageFetcher, RawPage};
pub use runner::{run_harvest, ExtractionRunner, RunSummary};
pub use throttle::Throttle;
