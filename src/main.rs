use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use dark_sky_reviews::config::Config;
use dark_sky_reviews::observability::{self, metrics};
use dark_sky_reviews::pipeline::{self, CleanReport, MergeReport, Merger};
use dark_sky_reviews::Origin;

#[derive(Parser)]
#[command(name = "dark_sky_reviews")]
#[command(about = "Clean, canonicalize and merge dark-sky site reviews")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $REVIEWS_CONFIG, then ./config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write a Prometheus text snapshot of run metrics to this file
    #[arg(long, global = true)]
    metrics_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean raw exports into per-origin intermediate tables
    Clean {
        /// Origins to clean (repeatable). All origins when omitted
        #[arg(long = "origin", value_enum)]
        origins: Vec<Origin>,
    },
    /// Merge existing intermediate tables into the unified dataset
    Merge,
    /// Clean, then merge
    Run {
        /// Origins to clean before merging (repeatable). All origins when omitted
        #[arg(long = "origin", value_enum)]
        origins: Vec<Origin>,
    },
}

fn selected(origins: Vec<Origin>) -> Vec<Origin> {
    if origins.is_empty() {
        Origin::MERGE_ORDER.to_vec()
    } else {
        origins
    }
}

fn print_clean(report: &CleanReport) {
    let origin = report.origin.map(|o| o.as_str()).unwrap_or("unknown");
    println!("\n🧹 Cleaner results for {}:", origin);
    println!("   Files read: {} ({} skipped)", report.files_read, report.files_skipped);
    println!("   Rows read: {} ({} undecodable)", report.rows_read, report.rows_skipped);
    println!("   Too short: {}", report.rows_too_short);
    println!("   Duplicates: {}", report.duplicates_removed);
    println!("   Written: {} -> {}", report.rows_written, report.output.display());
}

fn print_merge(report: &MergeReport) {
    let tables: Vec<&str> = report.tables_read.iter().map(|o| o.as_str()).collect();
    println!("\n🔀 Merge results:");
    let tables = if tables.is_empty() {
        "none".to_string()
    } else {
        tables.join(", ")
    };
    println!("   Tables: {}", tables);
    println!("   Rows read: {}", report.rows_read);
    println!("   Dropped: {}", report.rows_dropped);
    println!("   Duplicates: {}", report.duplicates_removed);
    println!("   Written: {} -> {}", report.rows_written, report.output.display());
    println!("   Seed: {}  sha256: {}", report.seed, report.output_sha256);
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = observability::init_logging();

    let cli = Cli::parse();

    let config_path = Config::resolve_path(cli.config.clone());
    let config = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let places = Arc::new(config.place_map().context("Invalid place aliases in config")?);

    if cli.metrics_file.is_some() {
        metrics::init()?;
    }

    match cli.command {
        Commands::Clean { origins } => {
            let origins = selected(origins);
            info!(?origins, "Running cleaners");
            let cleaners = pipeline::build_cleaners(&config, places, &origins);
            let reports = pipeline::run_cleaners(cleaners).await.map_err(|e| {
                error!("Cleaning failed: {}", e);
                e
            })?;
            for report in &reports {
                print_clean(report);
            }
        }
        Commands::Merge => {
            info!("Running merger");
            let merger = Merger::new(config.merger_config());
            let report = tokio::task::spawn_blocking(move || merger.run())
                .await?
                .map_err(|e| {
                    error!("Merge failed: {}", e);
                    e
                })?;
            print_merge(&report);
        }
        Commands::Run { origins } => {
            let origins = selected(origins);
            let report = pipeline::run_all(&config, places, &origins).await.map_err(|e| {
                error!("Pipeline failed: {}", e);
                e
            })?;
            for clean in &report.cleaners {
                print_clean(clean);
            }
            print_merge(&report.merge);
            println!("\n✅ Run {} finished", report.run_id);
        }
    }

    if let Some(path) = cli.metrics_file {
        let snapshot = metrics::render().unwrap_or_default();
        fs::write(&path, snapshot)
            .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
        info!("Metrics snapshot written to {}", path.display());
    }

    Ok(())
}
