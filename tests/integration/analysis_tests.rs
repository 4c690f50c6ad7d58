//! Distribution analysis over a harvested dataset

use crate::common::{create_test_config, mount_pages};
use paper_harvest::crawler::run_harvest;
use paper_harvest::output::{analyze_dataset, load_statistics, AnalysisError};
use tempfile::TempDir;
use wiremock::MockServer;

#[tokio::test]
async fn test_report_over_harvested_dataset() {
    let server = MockServer::start().await;
    // ID 6 is missing upstream and ends up without license or version
    mount_pages(&server, 1..=5).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), 1, 6);
    let dataset_path = config.output.dataset_path.clone();
    let report_dir = config.output.report_dir.clone();
    run_harvest(config).await.unwrap();

    let (stats, files) = analyze_dataset(&dataset_path, &report_dir).unwrap();

    assert_eq!(stats.total_records, 6);
    assert_eq!(stats.records_with_license, 5);
    assert_eq!(stats.records_with_version, 5);
    assert_eq!(
        stats.license_distribution,
        vec![("CC BY 4.0".to_string(), 5), ("Unknown".to_string(), 1)]
    );
    // Versions are (id % 3) + 1 for ids 1..=5: 2, 3, 1, 2, 3
    assert_eq!(
        stats.version_distribution,
        vec![
            ("1".to_string(), 1),
            ("2".to_string(), 2),
            ("3".to_string(), 2),
            ("Unknown".to_string(), 1),
        ]
    );

    let report = std::fs::read_to_string(&files.report).unwrap();
    assert!(report.contains("Total records analyzed: 6"));
    assert!(report.contains("License coverage: 83.3%"));
    assert!(report.contains("CC BY 4.0: 5 (83.3%)"));
    assert!(report.contains("Report generated on: "));

    assert!(files.license_chart.exists());
    assert!(files.version_chart.exists());
}

#[test]
fn test_missing_dataset_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = load_statistics(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, AnalysisError::Csv { .. }));
}
