//! End-to-end harvest runs against a mock abstract server

use crate::common::{create_test_config, mount_pages, requests_for};
use paper_harvest::crawler::run_harvest;
use paper_harvest::dataset::read_dataset;
use paper_harvest::record::DocumentId;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ids(records: &[paper_harvest::MetadataRecord]) -> Vec<u64> {
    records.iter().map(|record| record.doc_id.value()).collect()
}

#[tokio::test]
async fn test_full_harvest_extracts_fields() {
    let server = MockServer::start().await;
    mount_pages(&server, 1..=4).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), 1, 4);
    let dataset_path = config.output.dataset_path.clone();

    let summary = run_harvest(config).await.unwrap();

    assert_eq!(summary.requested, 4);
    assert_eq!(summary.written, 4);
    assert_eq!(summary.succeeded, 4);
    assert_eq!(summary.network_requests, 4);
    assert_eq!(summary.dataset_rows, 4);

    let records = read_dataset(&dataset_path).unwrap();
    assert_eq!(ids(&records), vec![1, 2, 3, 4]);

    let second = &records[1];
    assert_eq!(second.abs_url, format!("{}/abs/2", server.uri()));
    assert_eq!(second.license_name.as_deref(), Some("CC BY 4.0"));
    assert_eq!(
        second.license_url.as_deref(),
        Some("http://creativecommons.org/licenses/by/4.0/")
    );
    assert_eq!(second.version, Some(3));
    assert_eq!(second.title.as_deref(), Some("Paper number 2"));
    assert_eq!(second.authors, vec!["Author One", "Author Two"]);
    assert_eq!(
        second.subjects,
        vec!["High Energy Physics - Theory (hep-th)"]
    );
}

#[tokio::test]
async fn test_not_found_keeps_every_row() {
    let server = MockServer::start().await;
    mount_pages(&server, (1..=10).filter(|id| *id != 5)).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), 1, 10);
    let dataset_path = config.output.dataset_path.clone();

    let summary = run_harvest(config).await.unwrap();

    assert_eq!(summary.written, 10);
    assert_eq!(summary.succeeded, 9);
    assert_eq!(summary.not_found, 1);
    // 404 is not retried
    assert_eq!(requests_for(&server, "/abs/5").await, 1);

    let records = read_dataset(&dataset_path).unwrap();
    assert_eq!(ids(&records), (1..=10).collect::<Vec<_>>());

    let missing = &records[4];
    assert_eq!(missing.doc_id, DocumentId(5));
    assert!(missing.is_empty());
    assert_eq!(missing.abs_url, format!("{}/abs/5", server.uri()));

    assert!(!records[3].is_empty());
    assert!(!records[5].is_empty());
}

#[tokio::test]
async fn test_transient_failure_retried_then_recorded_empty() {
    let server = MockServer::start().await;
    mount_pages(&server, [1, 2, 4]).await;
    Mock::given(method("GET"))
        .and(path("/abs/3"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), 1, 4);
    let dataset_path = config.output.dataset_path.clone();

    let summary = run_harvest(config).await.unwrap();

    assert_eq!(summary.server_errors, 1);
    assert_eq!(summary.network_requests, 6);

    let records = read_dataset(&dataset_path).unwrap();
    assert_eq!(ids(&records), vec![1, 2, 3, 4]);
    assert!(records[2].is_empty());

    // Failed pages are never cached
    assert!(!dir.path().join("pages").join("3.html").exists());
    assert!(dir.path().join("pages").join("4.html").exists());
}

#[tokio::test]
async fn test_client_error_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/abs/1"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), 1, 1);

    let summary = run_harvest(config).await.unwrap();

    assert_eq!(summary.server_errors, 1);
    assert_eq!(summary.network_requests, 1);
    assert_eq!(summary.dataset_rows, 1);
}

#[tokio::test]
async fn test_unrecognized_page_counted_as_parse_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/abs/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>Down for maintenance</body></html>"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), 1, 1);
    let dataset_path = config.output.dataset_path.clone();

    let summary = run_harvest(config).await.unwrap();

    assert_eq!(summary.parse_failures, 1);
    assert_eq!(summary.succeeded, 0);
    assert!(read_dataset(&dataset_path).unwrap()[0].is_empty());
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let server = MockServer::start().await;
    mount_pages(&server, 1..=6).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), 1, 6);
    let dataset_path = config.output.dataset_path.clone();

    run_harvest(config.clone()).await.unwrap();
    let first = std::fs::read_to_string(&dataset_path).unwrap();

    let summary = run_harvest(config).await.unwrap();
    let second = std::fs::read_to_string(&dataset_path).unwrap();

    assert_eq!(summary.skipped, 6);
    assert_eq!(summary.written, 0);
    assert_eq!(summary.network_requests, 0);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_resume_matches_single_run() {
    let server = MockServer::start().await;
    mount_pages(&server, 1..=8).await;

    // Interrupted-then-resumed run: first half, then the whole range
    let resumed_dir = TempDir::new().unwrap();
    let partial = create_test_config(&server.uri(), resumed_dir.path(), 1, 4);
    run_harvest(partial).await.unwrap();
    let full = create_test_config(&server.uri(), resumed_dir.path(), 1, 8);
    let resumed_path = full.output.dataset_path.clone();
    let summary = run_harvest(full).await.unwrap();
    assert_eq!(summary.skipped, 4);
    assert_eq!(summary.written, 4);

    // Uninterrupted run into a separate directory
    let single_dir = TempDir::new().unwrap();
    let single = create_test_config(&server.uri(), single_dir.path(), 1, 8);
    let single_path = single.output.dataset_path.clone();
    run_harvest(single).await.unwrap();

    assert_eq!(
        read_dataset(&resumed_path).unwrap(),
        read_dataset(&single_path).unwrap()
    );
}

#[tokio::test]
async fn test_out_of_order_resume_is_finalized_sorted() {
    let server = MockServer::start().await;
    mount_pages(&server, 1..=6).await;

    let dir = TempDir::new().unwrap();
    run_harvest(create_test_config(&server.uri(), dir.path(), 4, 6))
        .await
        .unwrap();

    let config = create_test_config(&server.uri(), dir.path(), 1, 6);
    let dataset_path = config.output.dataset_path.clone();
    let summary = run_harvest(config).await.unwrap();

    assert_eq!(summary.skipped, 3);
    assert_eq!(summary.dataset_rows, 6);
    assert_eq!(
        ids(&read_dataset(&dataset_path).unwrap()),
        vec![1, 2, 3, 4, 5, 6]
    );
}

#[tokio::test]
async fn test_cached_pages_skip_network() {
    let server = MockServer::start().await;
    mount_pages(&server, 1..=5).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), 1, 5);
    let dataset_path = config.output.dataset_path.clone();

    let first = run_harvest(config.clone()).await.unwrap();
    assert_eq!(first.network_requests, 5);
    let first_rows = read_dataset(&dataset_path).unwrap();

    // Drop the dataset but keep the page cache
    std::fs::remove_file(&dataset_path).unwrap();

    let second = run_harvest(config).await.unwrap();

    assert_eq!(second.network_requests, 0);
    assert_eq!(second.cache_hits, 5);
    assert_eq!(server.received_requests().await.unwrap().len(), 5);
    assert_eq!(read_dataset(&dataset_path).unwrap(), first_rows);
}

#[tokio::test]
async fn test_requests_carry_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/abs/7"))
        .and(wiremock::matchers::header(
            "user-agent",
            "TestHarvester/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(crate::common::abstract_page(7, 1)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let summary = run_harvest(create_test_config(&server.uri(), dir.path(), 7, 7))
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 1);
}
