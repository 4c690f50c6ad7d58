//! Storage failures abort the run without losing flushed rows

use crate::common::{create_test_config, mount_pages};
use paper_harvest::crawler::{build_http_client, ExtractionRunner, PageFetcher};
use paper_harvest::dataset::{
    open_dataset, read_dataset, CsvDataset, DatasetError, DatasetResult, DatasetSink,
};
use paper_harvest::record::{DocumentId, DocumentTarget, MetadataRecord};
use paper_harvest::source::build_plan;
use paper_harvest::storage::{open_cache, CacheError, CacheResult, DiskPageCache, PageCache};
use paper_harvest::HarvestError;
use std::io;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::MockServer;

/// Dataset whose flushes start failing after a number of successful ones
struct FailingDataset {
    inner: CsvDataset,
    flushes_left: usize,
}

impl DatasetSink for FailingDataset {
    fn contains(&self, id: DocumentId) -> bool {
        self.inner.contains(id)
    }

    fn append(&mut self, record: MetadataRecord) -> DatasetResult<()> {
        self.inner.append(record)
    }

    fn flush(&mut self) -> DatasetResult<()> {
        if self.flushes_left == 0 {
            return Err(DatasetError::Io {
                path: self.inner.path().to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, "no space left on device"),
            });
        }
        self.flushes_left -= 1;
        self.inner.flush()
    }

    fn finalize(&mut self) -> DatasetResult<usize> {
        self.flush()?;
        self.inner.finalize()
    }
}

/// Page cache that refuses to store one document
struct FailingCache {
    inner: DiskPageCache,
    fail_on: DocumentId,
}

impl PageCache for FailingCache {
    fn has(&self, id: DocumentId) -> bool {
        self.inner.has(id)
    }

    fn get(&self, id: DocumentId) -> CacheResult<String> {
        self.inner.get(id)
    }

    fn put(&mut self, id: DocumentId, content: &str) -> CacheResult<()> {
        if id == self.fail_on {
            return Err(CacheError::Write {
                id,
                path: self.inner.entry_path(id),
                source: io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "read-only file system",
                ),
            });
        }
        self.inner.put(id, content)
    }
}

fn plan_for(config: &paper_harvest::Config) -> Vec<DocumentTarget> {
    build_plan(&config.source, &config.fetcher).unwrap()
}

#[tokio::test]
async fn test_dataset_failure_aborts_with_flushed_rows_only() {
    let server = MockServer::start().await;
    mount_pages(&server, 1..=10).await;

    let dir = TempDir::new().unwrap();
    let config = Arc::new(create_test_config(&server.uri(), dir.path(), 1, 10));
    let dataset_path = config.output.dataset_path.clone();

    let client = build_http_client(&config.user_agent, config.fetcher.timeout()).unwrap();
    let cache = open_cache(&config.output.cache_dir).unwrap();
    let fetcher = PageFetcher::new(client, cache, &config.fetcher);
    let dataset = FailingDataset {
        inner: open_dataset(&dataset_path).unwrap(),
        flushes_left: 1,
    };

    let mut runner = ExtractionRunner::new(Arc::clone(&config), fetcher, dataset);
    let err = runner.run(&plan_for(&config)).await.unwrap_err();

    assert!(matches!(err, HarvestError::Dataset(DatasetError::Io { .. })));
    // Pages 1-6 were fetched before the second checkpoint failed
    assert_eq!(runner.fetcher().network_requests(), 6);
    assert!(err.to_string().contains("metadata.csv"));

    // flush-interval is 3: only the first checkpoint reached the file
    let rows = read_dataset(&dataset_path).unwrap();
    assert_eq!(
        rows.iter().map(|r| r.doc_id.value()).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[tokio::test]
async fn test_cache_failure_aborts_with_id_and_path() {
    let server = MockServer::start().await;
    mount_pages(&server, 1..=6).await;

    let dir = TempDir::new().unwrap();
    let config = Arc::new(create_test_config(&server.uri(), dir.path(), 1, 6));
    let dataset_path = config.output.dataset_path.clone();

    let client = build_http_client(&config.user_agent, config.fetcher.timeout()).unwrap();
    let cache = FailingCache {
        inner: open_cache(&config.output.cache_dir).unwrap(),
        fail_on: DocumentId(5),
    };
    let fetcher = PageFetcher::new(client, cache, &config.fetcher);
    let dataset = open_dataset(&dataset_path).unwrap();

    let mut runner = ExtractionRunner::new(Arc::clone(&config), fetcher, dataset);
    let err = runner.run(&plan_for(&config)).await.unwrap_err();

    match &err {
        HarvestError::Cache(CacheError::Write { id, path, .. }) => {
            assert_eq!(*id, DocumentId(5));
            assert!(path.ends_with("5.html"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(err.to_string().contains("document 5"));

    // Row 4 was appended but never flushed
    let rows = read_dataset(&dataset_path).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(!runner.dataset().contains(DocumentId(6)));
}

#[tokio::test]
async fn test_dataset_with_foreign_header_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("metadata.csv");
    std::fs::write(&path, "id,name\n1,x\n").unwrap();

    let err = open_dataset(&path).unwrap_err();
    assert!(matches!(err, DatasetError::HeaderMismatch { .. }));
}
