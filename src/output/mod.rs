//! Output module for dataset analysis and reports
//!
//! This module handles:
//! - Computing license and version distributions from a dataset
//! - Printing statistics to the console
//! - Writing the text report and bar charts

mod chart;
mod error;
mod report;
pub mod stats;

pub use chart::{render_bar_chart, BarStyle};
pub use error::{AnalysisError, AnalysisResult};
pub use report::{
    format_report, write_report, ReportFiles, LICENSE_CHART_FILE, REPORT_FILE,
    VERSION_CHART_FILE,
};
pub use stats::{load_statistics, print_statistics, DistributionStats};

use std::path::Path;

/// Loads a dataset and writes its report into `report_dir`
///
/// # Arguments
///
/// * `dataset_path` - The harvested CSV
/// * `report_dir` - Directory for the report and charts
///
/// # Returns
///
/// * `Ok((DistributionStats, ReportFiles))` - The statistics and the written files
/// * `Err(AnalysisError)` - Failed to read the dataset or write the report
pub fn analyze_dataset(
    dataset_path: &Path,
    report_dir: &Path,
) -> AnalysisResult<(DistributionStats, ReportFiles)> {
    let stats = load_statistics(dataset_path)?;
    let files = write_report(&stats, report_dir)?;
    Ok((stats, files))
}
