//! Distribution statistics over a harvested dataset
//!
//! This module reads the `license_name` and `version` columns of a dataset
//! and computes the license and version distributions used by the report.

use crate::output::error::{AnalysisError, AnalysisResult};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

/// Label used for records without a license or version
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Number of licenses listed in the top-licenses section
pub const TOP_LICENSES: usize = 5;

/// License and version statistics for one dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionStats {
    /// Total number of records analyzed
    pub total_records: usize,

    /// Records with a license name
    pub records_with_license: usize,

    /// Records with a version number
    pub records_with_version: usize,

    /// License name counts, most frequent first (ties by name)
    pub license_distribution: Vec<(String, usize)>,

    /// Version counts, numeric order with `Unknown` last
    pub version_distribution: Vec<(String, usize)>,
}

impl DistributionStats {
    /// Computes statistics from `(license_name, version)` cell pairs
    ///
    /// Empty cells count as [`UNKNOWN_LABEL`].
    pub fn from_cells<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut licenses: HashMap<String, usize> = HashMap::new();
        let mut versions: HashMap<String, usize> = HashMap::new();
        let mut total_records = 0;
        let mut records_with_license = 0;
        let mut records_with_version = 0;

        for (license, version) in rows {
            total_records += 1;

            let license = license.trim();
            let license_label = if license.is_empty() {
                UNKNOWN_LABEL.to_string()
            } else {
                records_with_license += 1;
                license.to_string()
            };
            *licenses.entry(license_label).or_insert(0) += 1;

            let version = normalize_version(version);
            let version_label = match version {
                Some(version) => {
                    records_with_version += 1;
                    version
                }
                None => UNKNOWN_LABEL.to_string(),
            };
            *versions.entry(version_label).or_insert(0) += 1;
        }

        let mut license_distribution: Vec<(String, usize)> = licenses.into_iter().collect();
        license_distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut version_distribution: Vec<(String, usize)> = versions.into_iter().collect();
        version_distribution.sort_by(|a, b| compare_versions(&a.0, &b.0));

        Self {
            total_records,
            records_with_license,
            records_with_version,
            license_distribution,
            version_distribution,
        }
    }

    /// Percentage of records with a license name
    pub fn license_coverage(&self) -> f64 {
        percentage(self.records_with_license, self.total_records)
    }

    /// Percentage of records with a version number
    pub fn version_coverage(&self) -> f64 {
        percentage(self.records_with_version, self.total_records)
    }

    /// The most frequent licenses, `Unknown` included
    pub fn top_licenses(&self) -> &[(String, usize)] {
        let n = self.license_distribution.len().min(TOP_LICENSES);
        &self.license_distribution[..n]
    }

    /// Share of all records that `count` represents, in percent
    pub fn share(&self, count: usize) -> f64 {
        percentage(count, self.total_records)
    }

    /// Version counts without the `Unknown` bucket
    pub fn known_versions(&self) -> Vec<(String, usize)> {
        self.version_distribution
            .iter()
            .filter(|(label, _)| label != UNKNOWN_LABEL)
            .cloned()
            .collect()
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Reduces a version cell to its label; `v3` and `3` both become `3`
fn normalize_version(cell: &str) -> Option<String> {
    let cell = cell.trim();
    let cell = cell
        .strip_prefix('v')
        .or_else(|| cell.strip_prefix('V'))
        .unwrap_or(cell);

    if cell.is_empty() {
        None
    } else {
        Some(cell.to_string())
    }
}

/// Numeric labels ascending, then other labels by name, then `Unknown`
fn compare_versions(a: &str, b: &str) -> Ordering {
    let rank = |label: &str| -> (u8, u64) {
        if label == UNKNOWN_LABEL {
            (2, 0)
        } else if let Ok(number) = label.parse::<u64>() {
            (0, number)
        } else {
            (1, 0)
        }
    };

    rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
}

/// Loads statistics from a dataset file
///
/// The `license_name` and `version` columns are located by header name.
///
/// # Arguments
///
/// * `path` - The dataset CSV
///
/// # Returns
///
/// * `Ok(DistributionStats)` - Successfully computed statistics
/// * `Err(AnalysisError)` - Unreadable file or missing column
pub fn load_statistics(path: &Path) -> AnalysisResult<DistributionStats> {
    let csv_error = |source: csv::Error| AnalysisError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| AnalysisError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };
    let license_column = column("license_name")?;
    let version_column = column("version")?;

    let mut cells = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        cells.push((
            row.get(license_column).unwrap_or_default().to_string(),
            row.get(version_column).unwrap_or_default().to_string(),
        ));
    }

    tracing::info!("Loaded {} records from {}", cells.len(), path.display());

    Ok(DistributionStats::from_cells(
        cells.iter().map(|(license, version)| (license.as_str(), version.as_str())),
    ))
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &DistributionStats) {
    println!("=== Distribution Statistics ===\n");

    println!("Overview:");
    println!("  Total records: {}", stats.total_records);
    println!(
        "  License coverage: {:.1}% ({} records)",
        stats.license_coverage(),
        stats.records_with_license
    );
    println!(
        "  Version coverage: {:.1}% ({} records)",
        stats.version_coverage(),
        stats.records_with_version
    );
    println!();

    println!("Licenses:");
    for (license, count) in &stats.license_distribution {
        println!("  {}: {} ({:.1}%)", license, count, stats.share(*count));
    }
    println!();

    println!("Versions:");
    for (version, count) in &stats.version_distribution {
        println!("  {}: {} ({:.1}%)", version, count, stats.share(*count));
    }
    println!();

    match stats.license_distribution.first() {
        Some((license, _)) => println!("Most common license: {}", license),
        None => println!("Most common license: n/a"),
    }
}
