//! Stage counters for the cleaning and merge runs.
//!
//! Recording goes through the `metrics` facade, so every call is a no-op
//! until [`init`] installs the Prometheus recorder.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt;
use std::sync::OnceLock;
use tracing::info;

use crate::error::{PipelineError, Result};

/// All metric names used by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Cleaner metrics
    CleanerFilesRead,
    CleanerFilesSkipped,
    CleanerRowsRead,
    CleanerRowsSkipped,
    CleanerRowsTooShort,
    CleanerDuplicatesRemoved,
    CleanerRowsWritten,

    // Merger metrics
    MergerTablesRead,
    MergerRowsDropped,
    MergerDuplicatesRemoved,
    MergerRowsWritten,

    StageDuration,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::CleanerFilesRead => "reviews_cleaner_files_read_total",
            MetricName::CleanerFilesSkipped => "reviews_cleaner_files_skipped_total",
            MetricName::CleanerRowsRead => "reviews_cleaner_rows_read_total",
            MetricName::CleanerRowsSkipped => "reviews_cleaner_rows_skipped_total",
            MetricName::CleanerRowsTooShort => "reviews_cleaner_rows_too_short_total",
            MetricName::CleanerDuplicatesRemoved => "reviews_cleaner_duplicates_removed_total",
            MetricName::CleanerRowsWritten => "reviews_cleaner_rows_written_total",
            MetricName::MergerTablesRead => "reviews_merger_tables_read_total",
            MetricName::MergerRowsDropped => "reviews_merger_rows_dropped_total",
            MetricName::MergerDuplicatesRemoved => "reviews_merger_duplicates_removed_total",
            MetricName::MergerRowsWritten => "reviews_merger_rows_written_total",
            MetricName::StageDuration => "reviews_stage_duration_seconds",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Calling it twice is an error.
pub fn init() -> Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| {
            PipelineError::Metrics(format!("Failed to install Prometheus recorder: {e}"))
        })?;
    HANDLE
        .set(handle)
        .map_err(|_| PipelineError::Metrics("metrics recorder already installed".to_string()))?;
    info!("Metrics recorder installed");
    Ok(())
}

/// Prometheus text exposition of everything recorded so far
pub fn render() -> Option<String> {
    HANDLE.get().map(|h| h.render())
}

pub fn stage_duration(stage: &'static str, secs: f64) {
    ::metrics::histogram!(MetricName::StageDuration.as_str(), "stage" => stage).record(secs);
}

// ============================================================================
// Cleaner Metrics
// ============================================================================

pub mod cleaner {
    use super::MetricName;

    fn add(name: MetricName, origin: &'static str, n: usize) {
        ::metrics::counter!(name.as_str(), "origin" => origin).increment(n as u64);
    }

    pub fn file_read(origin: &'static str) {
        add(MetricName::CleanerFilesRead, origin, 1);
    }

    pub fn file_skipped(origin: &'static str) {
        add(MetricName::CleanerFilesSkipped, origin, 1);
    }

    pub fn rows_read(origin: &'static str, n: usize) {
        add(MetricName::CleanerRowsRead, origin, n);
    }

    pub fn rows_skipped(origin: &'static str, n: usize) {
        add(MetricName::CleanerRowsSkipped, origin, n);
    }

    pub fn rows_too_short(origin: &'static str, n: usize) {
        add(MetricName::CleanerRowsTooShort, origin, n);
    }

    pub fn duplicates_removed(origin: &'static str, n: usize) {
        add(MetricName::CleanerDuplicatesRemoved, origin, n);
    }

    pub fn rows_written(origin: &'static str, n: usize) {
        add(MetricName::CleanerRowsWritten, origin, n);
    }
}

// ============================================================================
// Merger Metrics
// ============================================================================

pub mod merger {
    use super::MetricName;

    pub fn tables_read(n: usize) {
        ::metrics::counter!(MetricName::MergerTablesRead.as_str()).increment(n as u64);
    }

    pub fn rows_dropped(n: usize) {
        ::metrics::counter!(MetricName::MergerRowsDropped.as_str()).increment(n as u64);
    }

    pub fn duplicates_removed(n: usize) {
        ::metrics::counter!(MetricName::MergerDuplicatesRemoved.as_str()).increment(n as u64);
    }

    pub fn rows_written(n: usize) {
        ::metrics::counter!(MetricName::MergerRowsWritten.as_str()).increment(n as u64);
    }
}
