//! Stage orchestration: per-origin cleaners fan out, the merger runs after
//! all of them have finished.

pub mod cleaner;
pub mod dedup;
pub mod merger;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::constants::RUN_REPORT_FILE;
use crate::error::Result;
use crate::normalize::CanonicalPlaceMap;
use crate::sources;
use crate::types::Origin;

pub use cleaner::{CleanReport, SourceCleaner};
pub use merger::{MergeReport, Merger};

/// Summary of a full clean + merge run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub cleaners: Vec<CleanReport>,
    pub merge: MergeReport,
}

/// Cleaners for the selected origins, in the order given
pub fn build_cleaners(
    config: &Config,
    places: Arc<CanonicalPlaceMap>,
    origins: &[Origin],
) -> Vec<SourceCleaner> {
    origins
        .iter()
        .map(|origin| SourceCleaner::new(sources::cleaner_config(*origin, config), places.clone()))
        .collect()
}

/// Run cleaners concurrently on blocking tasks and wait for all of them.
/// Reports come back in the order the cleaners were given.
pub async fn run_cleaners(cleaners: Vec<SourceCleaner>) -> Result<Vec<CleanReport>> {
    let handles: Vec<_> = cleaners
        .into_iter()
        .map(|cleaner| tokio::task::spawn_blocking(move || cleaner.run()))
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        reports.push(handle.await??);
    }
    Ok(reports)
}

/// Clean the selected origins, then merge whatever intermediate tables exist
#[instrument(skip(config, places))]
pub async fn run_all(
    config: &Config,
    places: Arc<CanonicalPlaceMap>,
    origins: &[Origin],
) -> Result<PipelineReport> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    info!(%run_id, "Starting review pipeline");

    let cleaners = build_cleaners(config, places, origins);
    let cleaner_reports = run_cleaners(cleaners).await?;

    let merger = Merger::new(config.merger_config());
    let merge = tokio::task::spawn_blocking(move || merger.run()).await??;

    let report = PipelineReport {
        run_id,
        started_at,
        finished_at: Utc::now(),
        cleaners: cleaner_reports,
        merge,
    };

    let report_path = report_path(&config.paths.unified_output);
    write_report(&report, &report_path)?;
    info!(%run_id, report = %report_path.display(), "Review pipeline finished");
    Ok(report)
}

/// Run report location: beside the unified table
pub fn report_path(unified_output: &Path) -> PathBuf {
    unified_output
        .parent()
        .map(|p| p.join(RUN_REPORT_FILE))
        .unwrap_or_else(|| PathBuf::from(RUN_REPORT_FILE))
}

fn write_report(report: &PipelineReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(report)?)?;
    Ok(())
}
