//! Text report generation
//!
//! This module writes the plain-text distribution report and the two bar
//! charts that accompany it.

use crate::output::chart::{render_bar_chart, LICENSE_STYLE, VERSION_STYLE};
use crate::output::error::{AnalysisError, AnalysisResult};
use crate::output::stats::DistributionStats;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the text report inside the report directory
pub const REPORT_FILE: &str = "analysis_report.txt";

/// File name of the license chart inside the report directory
pub const LICENSE_CHART_FILE: &str = "license_distribution.svg";

/// File name of the version chart inside the report directory
pub const VERSION_CHART_FILE: &str = "version_distribution.svg";

/// Paths of the files written by [`write_report`]
#[derive(Debug, Clone)]
pub struct ReportFiles {
    pub report: PathBuf,
    pub license_chart: PathBuf,
    pub version_chart: PathBuf,
}

/// Formats an integer with thousands separators
fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn push_distribution(out: &mut String, stats: &DistributionStats, rows: &[(String, usize)]) {
    for (label, count) in rows {
        out.push_str(&format!(
            "{}: {} ({:.1}%)\n",
            label,
            format_count(*count),
            stats.share(*count)
        ));
    }
}

/// Formats the distribution report
///
/// # Arguments
///
/// * `stats` - The statistics to report
/// * `generated_at` - Timestamp written at the end of the report
///
/// # Returns
///
/// The report text
pub fn format_report(stats: &DistributionStats, generated_at: DateTime<Local>) -> String {
    let mut out = String::new();

    out.push_str("ARXIV LICENSE AND VERSION DISTRIBUTION REPORT\n");
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");

    out.push_str("SUMMARY STATISTICS:\n");
    out.push_str(&"-".repeat(20));
    out.push('\n');
    out.push_str(&format!(
        "Total records analyzed: {}\n",
        format_count(stats.total_records)
    ));
    out.push_str(&format!(
        "Records with license information: {}\n",
        format_count(stats.records_with_license)
    ));
    out.push_str(&format!(
        "Records with version information: {}\n",
        format_count(stats.records_with_version)
    ));
    out.push_str(&format!("License coverage: {:.1}%\n", stats.license_coverage()));
    out.push_str(&format!("Version coverage: {:.1}%\n\n", stats.version_coverage()));

    out.push_str("TOP 5 LICENSES:\n");
    out.push_str(&"-".repeat(15));
    out.push('\n');
    push_distribution(&mut out, stats, stats.top_licenses());

    out.push_str("\nDETAILED LICENSE DISTRIBUTION:\n");
    out.push_str(&"-".repeat(30));
    out.push('\n');
    push_distribution(&mut out, stats, &stats.license_distribution);

    out.push_str("\nVERSION DISTRIBUTION:\n");
    out.push_str(&"-".repeat(20));
    out.push('\n');
    push_distribution(&mut out, stats, &stats.version_distribution);

    out.push_str(&format!(
        "\nReport generated on: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    out
}

/// Writes the text report and both charts into `dir`
///
/// The directory is created if missing. Existing files are overwritten.
///
/// # Arguments
///
/// * `stats` - The statistics to report
/// * `dir` - The report directory
///
/// # Returns
///
/// * `Ok(ReportFiles)` - Paths of the written files
/// * `Err(AnalysisError)` - Failed to create the directory or write a file
pub fn write_report(stats: &DistributionStats, dir: &Path) -> AnalysisResult<ReportFiles> {
    fs::create_dir_all(dir).map_err(|source| AnalysisError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let files = ReportFiles {
        report: dir.join(REPORT_FILE),
        license_chart: dir.join(LICENSE_CHART_FILE),
        version_chart: dir.join(VERSION_CHART_FILE),
    };

    write_file(&files.report, &format_report(stats, Local::now()))?;

    let license_chart = render_bar_chart(
        "License Type Distribution",
        "License Type",
        &stats.license_distribution,
        LICENSE_STYLE,
    );
    write_file(&files.license_chart, &license_chart)?;

    let version_chart = render_bar_chart(
        "Version Distribution",
        "Version",
        &stats.known_versions(),
        VERSION_STYLE,
    );
    write_file(&files.version_chart, &version_chart)?;

    tracing::info!("Report written to {}", files.report.display());
    tracing::info!(
        "License distribution chart written to {}",
        files.license_chart.display()
    );
    tracing::info!(
        "Version distribution chart written to {}",
        files.version_chart.display()
    );

    Ok(files)
}

fn write_file(path: &Path, content: &str) -> AnalysisResult<()> {
    fs::write(path, content).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })
}
