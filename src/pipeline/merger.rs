use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::observability::metrics;
use crate::pipeline::dedup::{dedup_records, retain_substantive};
use crate::storage::{read_table, write_table, StoredRow};
use crate::types::{Origin, ReviewRecord};

#[derive(Debug, Clone)]
pub struct MergerConfig {
    pub intermediate_dir: PathBuf,
    pub output: PathBuf,
    pub seed: u64,
}

/// Outcome of one merge run
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeReport {
    /// Intermediate tables found, in concatenation order
    pub tables_read: Vec<Origin>,
    pub rows_read: usize,
    /// Rows dropped for a missing or too-short comment
    pub rows_dropped: usize,
    pub duplicates_removed: usize,
    pub rows_written: usize,
    pub seed: u64,
    pub output: PathBuf,
    /// Hex SHA-256 of the written table
    pub output_sha256: String,
}

/// Shuffle in place with a generator seeded from `seed`.
/// The same input order and seed always produce the same output order.
pub fn seeded_shuffle(records: &mut [ReviewRecord], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    records.shuffle(&mut rng);
}

/// Concatenate, filter and deduplicate the intermediate rows.
/// The result is not yet shuffled.
pub fn combine(tables: Vec<Vec<StoredRow>>, report: &mut MergeReport) -> Vec<ReviewRecord> {
    let rows: Vec<StoredRow> = tables.into_iter().flatten().collect();
    report.rows_read = rows.len();

    let mut records: Vec<ReviewRecord> = rows
        .into_iter()
        .filter_map(StoredRow::into_record)
        .collect();
    let missing_comment = report.rows_read - records.len();
    let too_short = retain_substantive(&mut records);
    report.rows_dropped = missing_comment + too_short;

    let (records, removed) = dedup_records(records);
    report.duplicates_removed = removed;
    records
}

/// Combines the per-origin intermediate tables into the unified dataset
pub struct Merger {
    config: MergerConfig,
}

impl Merger {
    pub fn new(config: MergerConfig) -> Self {
        Self { config }
    }

    /// Intermediate tables that exist, in merge order. Absent ones are omitted.
    fn load_tables(&self, report: &mut MergeReport) -> Vec<Vec<StoredRow>> {
        let mut tables = Vec::new();
        for origin in Origin::MERGE_ORDER {
            let path = self.config.intermediate_dir.join(origin.intermediate_file_name());
            if !path.is_file() {
                debug!("No intermediate table for {} at {}", origin, path.display());
                continue;
            }
            match read_table(&path) {
                Ok(table) => {
                    debug!("{} rows from {}", table.rows.len(), path.display());
                    report.tables_read.push(origin);
                    tables.push(table.rows);
                }
                Err(e) => warn!("Skipping unreadable intermediate table {}: {}", path.display(), e),
            }
        }
        tables
    }

    #[instrument(skip(self), fields(output = %self.config.output.display()))]
    pub fn run(&self) -> Result<MergeReport> {
        let started = Instant::now();
        let mut report = MergeReport {
            seed: self.config.seed,
            output: self.config.output.clone(),
            ..MergeReport::default()
        };

        let tables = self.load_tables(&mut report);
        if tables.is_empty() {
            warn!(
                "No intermediate tables in {}, writing an empty unified table",
                self.config.intermediate_dir.display()
            );
            report.output_sha256 = write_table(&self.config.output, &[])?;
            metrics::merger::tables_read(0);
            metrics::merger::rows_written(0);
            metrics::stage_duration("merge", started.elapsed().as_secs_f64());
            return Ok(report);
        }

        let mut records = combine(tables, &mut report);
        seeded_shuffle(&mut records, self.config.seed);

        report.output_sha256 = write_table(&self.config.output, &records)?;
        report.rows_written = records.len();

        metrics::merger::tables_read(report.tables_read.len());
        metrics::merger::rows_dropped(report.rows_dropped);
        metrics::merger::duplicates_removed(report.duplicates_removed);
        metrics::merger::rows_written(report.rows_written);
        metrics::stage_duration("merge", started.elapsed().as_secs_f64());

        info!(
            "Merged {} tables: {} rows read, {} dropped, {} duplicates, {} written to {}",
            report.tables_read.len(),
            report.rows_read,
            report.rows_dropped,
            report.duplicates_removed,
            report.rows_written,
            report.output.display()
        );
        Ok(report)
    }
}
