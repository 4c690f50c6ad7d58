//! Paper-Harvest main entry point
//!
//! This is the command-line interface for the Paper-Harvest metadata harvester.

use anyhow::Context;
use clap::Parser;
use paper_harvest::config::{load_config_with_hash, Config};
use paper_harvest::crawler::run_harvest;
use paper_harvest::output::{analyze_dataset, load_statistics, print_statistics};
use paper_harvest::source::build_plan;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Paper-Harvest: a polite abstract-page metadata harvester
///
/// Paper-Harvest fetches abstract pages for a range or list of document IDs,
/// caches them on disk, extracts license, version and bibliographic fields,
/// and writes one CSV row per document. It can then report the license and
/// version distributions of the resulting dataset.
#[derive(Parser, Debug)]
#[command(name = "paper-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A polite abstract-page metadata harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Delete the existing dataset before harvesting (the page cache is kept)
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "report"])]
    fresh: bool,

    /// Validate config and show what would be harvested without fetching anything
    #[arg(long, conflicts_with_all = ["stats", "report"])]
    dry_run: bool,

    /// Show license and version statistics of the dataset and exit
    #[arg(long, conflicts_with_all = ["dry_run", "report"])]
    stats: bool,

    /// Write the distribution report and charts for the dataset and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    report: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else if cli.report {
        handle_report(&config)
    } else {
        handle_harvest(config, cli.fresh).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("paper_harvest=info,warn"),
            1 => EnvFilter::new("paper_harvest=debug,info"),
            2 => EnvFilter::new("paper_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be harvested
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Paper-Harvest Dry Run ===\n");

    println!("Source:");
    match config.source.id_range() {
        Some((start, end)) => println!("  ID range: {} - {}", start, end),
        None => println!("  ID range: (none)"),
    }
    if let Some(list) = &config.source.id_list {
        println!("  ID list: {}", list.display());
        println!("  ID column: {}", config.source.id_column);
        if let Some(url_column) = config.source.url_column {
            println!("  URL column: {}", url_column);
        }
    }

    println!("\nFetcher:");
    println!("  Abstract URL template: {}", config.fetcher.abstract_url_template);
    println!("  Request delay: {}s", config.fetcher.request_delay_seconds);
    println!("  Max retries: {}", config.fetcher.max_retries);
    println!("  Timeout: {}s", config.fetcher.timeout_seconds);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Dataset: {}", config.output.dataset_path.display());
    println!("  Cache directory: {}", config.output.cache_dir.display());
    println!("  Flush interval: {} rows", config.output.flush_interval);
    println!("  Report directory: {}", config.output.report_dir.display());

    let plan =
        build_plan(&config.source, &config.fetcher).context("Failed to build the ID plan")?;

    println!("\n✓ Configuration is valid");
    println!("✓ Would harvest {} documents", plan.len());
    if let (Some(first), Some(last)) = (plan.first(), plan.last()) {
        println!("  First: {} ({})", first.id, first.abstract_url);
        println!("  Last:  {} ({})", last.id, last.abstract_url);
    }

    Ok(())
}

/// Handles the --stats mode: shows distribution statistics of the dataset
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Dataset: {}\n", config.output.dataset_path.display());

    let stats = load_statistics(&config.output.dataset_path)
        .context("Failed to load dataset statistics")?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --report mode: writes the report and charts
fn handle_report(config: &Config) -> anyhow::Result<()> {
    println!("=== Writing Distribution Report ===\n");
    println!("Dataset: {}", config.output.dataset_path.display());
    println!("Output: {}", config.output.report_dir.display());
    println!();

    let (stats, files) = analyze_dataset(&config.output.dataset_path, &config.output.report_dir)
        .context("Failed to analyze dataset")?;

    println!("Total records: {}", stats.total_records);
    println!("License coverage: {:.1}%", stats.license_coverage());
    println!("Version coverage: {:.1}%", stats.version_coverage());
    if let Some((license, _)) = stats.license_distribution.first() {
        println!("Most common license: {}", license);
    }
    println!("\n✓ Report written to: {}", files.report.display());
    println!("✓ Charts written to: {}", config.output.report_dir.display());

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, fresh: bool) -> anyhow::Result<()> {
    let dataset_path = config.output.dataset_path.clone();

    if fresh && dataset_path.exists() {
        tracing::info!(
            "Starting fresh harvest, removing {}",
            dataset_path.display()
        );
        std::fs::remove_file(&dataset_path)
            .with_context(|| format!("Failed to remove {}", dataset_path.display()))?;
    } else {
        tracing::info!("Starting harvest (IDs already in the dataset are skipped)");
    }

    match run_harvest(config).await {
        Ok(summary) => {
            tracing::info!(
                "Harvest completed: {} rows in {}",
                summary.dataset_rows,
                dataset_path.display()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
