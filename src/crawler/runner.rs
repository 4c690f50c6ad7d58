//! Extraction runner - main harvest orchestration logic
//!
//! This module contains the main loop that drives every planned document
//! through fetch, extraction and dataset append, including:
//! - Skipping IDs already present in a previous partial output
//! - Periodic dataset checkpoints
//! - Final ordering of the dataset
//! - The end-of-run summary

use crate::config::Config;
use crate::crawler::extractor::FieldExtractor;
use crate::crawler::fetcher::{build_http_client, FetchStatus, PageFetcher};
use crate::dataset::{open_dataset, DatasetSink};
use crate::record::DocumentTarget;
use crate::source::build_plan;
use crate::state::{IdState, IdTracker};
use crate::storage::{open_cache, PageCache};
use crate::HarvestError;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Counters collected over one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// IDs in the plan
    pub requested: usize,

    /// IDs already present in the dataset before the run
    pub skipped: usize,

    /// Rows appended during this run
    pub written: usize,

    /// Pages fetched and at least one field extracted
    pub succeeded: usize,

    /// Pages the server reported as missing
    pub not_found: usize,

    /// Pages that failed after retries or with a client error
    pub server_errors: usize,

    /// Pages that were undecodable or had no recognizable structure
    pub parse_failures: usize,

    /// Pages served from the page cache
    pub cache_hits: usize,

    /// Network requests issued, retries included
    pub network_requests: u64,

    /// Rows in the finalized dataset
    pub dataset_rows: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunSummary {
    /// Share of processed (non-skipped) IDs that produced data, in percent
    pub fn success_rate(&self) -> f64 {
        let processed = self.requested - self.skipped;
        if processed == 0 {
            0.0
        } else {
            self.succeeded as f64 / processed as f64 * 100.0
        }
    }

    /// Logs the summary at info level
    pub fn log(&self) {
        tracing::info!("========== Harvest summary ==========");
        tracing::info!("Requested:       {}", self.requested);
        tracing::info!("Skipped:         {}", self.skipped);
        tracing::info!("Written:         {}", self.written);
        tracing::info!(
            "Succeeded:       {} ({:.1}%)",
            self.succeeded,
            self.success_rate()
        );
        tracing::info!("Not found:       {}", self.not_found);
        tracing::info!("Server errors:   {}", self.server_errors);
        tracing::info!("Parse failures:  {}", self.parse_failures);
        tracing::info!("Cache hits:      {}", self.cache_hits);
        tracing::info!("Network requests: {}", self.network_requests);
        tracing::info!("Dataset rows:    {}", self.dataset_rows);
        tracing::info!("Elapsed:         {:.2}s", self.elapsed.as_secs_f64());
    }
}

/// Drives a harvest plan through fetcher, extractor and dataset
pub struct ExtractionRunner<C: PageCache, D: DatasetSink> {
    config: Arc<Config>,
    fetcher: PageFetcher<C>,
    extractor: FieldExtractor,
    dataset: D,
}

impl<C: PageCache, D: DatasetSink> ExtractionRunner<C, D> {
    /// Creates a runner over an already opened fetcher and dataset
    pub fn new(config: Arc<Config>, fetcher: PageFetcher<C>, dataset: D) -> Self {
        Self {
            config,
            fetcher,
            extractor: FieldExtractor::new(),
            dataset,
        }
    }

    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    pub fn fetcher(&self) -> &PageFetcher<C> {
        &self.fetcher
    }

    /// Runs the main extraction loop
    ///
    /// IDs are processed in ascending order. Every processed ID produces
    /// exactly one row, whether or not its page could be fetched.
    ///
    /// # Arguments
    ///
    /// * `plan` - The documents to harvest
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - Every ID was written or skipped and the dataset was finalized
    /// * `Err(HarvestError)` - A cache or dataset failure aborted the run; rows
    ///   appended since the last checkpoint are not flushed
    pub async fn run(&mut self, plan: &[DocumentTarget]) -> Result<RunSummary, HarvestError> {
        let start_time = Instant::now();
        let flush_interval = self.config.output.flush_interval.max(1);

        let mut ordered: Vec<&DocumentTarget> = plan.iter().collect();
        ordered.sort_by_key(|target| target.id);
        ordered.dedup_by_key(|target| target.id);

        let mut summary = RunSummary {
            requested: ordered.len(),
            ..RunSummary::default()
        };
        let mut unflushed = 0;

        tracing::info!("Starting harvest of {} documents", summary.requested);

        for target in ordered {
            let mut tracker = IdTracker::new(target.id);

            if self.dataset.contains(target.id) {
                tracker.advance(IdState::Skipped)?;
                summary.skipped += 1;
                tracing::debug!("Document {}: already in dataset, skipping", target.id);
                continue;
            }

            tracker.advance(IdState::Fetching)?;
            let raw = self.fetcher.fetch(target).await.map_err(|e| {
                tracing::error!("Document {}: page cache failure: {}", target.id, e);
                HarvestError::from(e)
            })?;

            if raw.from_cache {
                summary.cache_hits += 1;
            }

            let record = self.extractor.extract(target, &raw);
            tracker.advance(IdState::Extracted)?;

            match raw.status {
                FetchStatus::Success if record.is_empty() => summary.parse_failures += 1,
                FetchStatus::Success => summary.succeeded += 1,
                FetchStatus::NotFound => summary.not_found += 1,
                FetchStatus::ServerError => summary.server_errors += 1,
                FetchStatus::ParseFailure => summary.parse_failures += 1,
            }

            self.dataset.append(record).map_err(|e| {
                tracing::error!("Document {}: dataset append failed: {}", target.id, e);
                HarvestError::from(e)
            })?;
            tracker.advance(IdState::Written)?;
            summary.written += 1;
            unflushed += 1;

            if unflushed >= flush_interval {
                self.dataset.flush().map_err(|e| {
                    tracing::error!(
                        "Checkpoint after document {} failed: {}",
                        target.id,
                        e
                    );
                    HarvestError::from(e)
                })?;
                unflushed = 0;

                let processed = summary.written + summary.skipped;
                let elapsed = start_time.elapsed();
                tracing::info!(
                    "Progress: {}/{} documents, {:.2} docs/sec",
                    processed,
                    summary.requested,
                    processed as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
                );
            }
        }

        summary.dataset_rows = self.dataset.finalize()?;
        summary.network_requests = self.fetcher.network_requests();
        summary.elapsed = start_time.elapsed();

        Ok(summary)
    }
}

/// Runs a complete harvest from configuration
///
/// This is the main entry point for the extraction stage. It will:
/// 1. Build the document plan from the configured range or list
/// 2. Open the page cache and the dataset
/// 3. Build the HTTP client
/// 4. Run every planned document through the pipeline
///
/// # Arguments
///
/// * `config` - The harvester configuration
///
/// # Returns
///
/// * `Ok(RunSummary)` - Harvest completed
/// * `Err(HarvestError)` - Setup failed or a storage failure aborted the run
pub async fn run_harvest(config: Config) -> Result<RunSummary, HarvestError> {
    let config = Arc::new(config);

    let plan = build_plan(&config.source, &config.fetcher)?;
    let cache = open_cache(&config.output.cache_dir)?;
    let dataset = open_dataset(&config.output.dataset_path)?;
    let client = build_http_client(&config.user_agent, config.fetcher.timeout())?;

    tracing::info!(
        "Cache: {}, dataset: {}",
        config.output.cache_dir.display(),
        config.output.dataset_path.display()
    );

    let fetcher = PageFetcher::new(client, cache, &config.fetcher);
    let mut runner = ExtractionRunner::new(Arc::clone(&config), fetcher, dataset);
    let summary = runner.run(&plan).await?;

    summary.log();
    Ok(summary)
}
