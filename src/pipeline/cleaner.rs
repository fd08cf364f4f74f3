use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::normalize::{clean_text_value, CanonicalPlaceMap};
use crate::observability::metrics;
use crate::pipeline::dedup::{dedup_records, retain_substantive};
use crate::storage::{read_raw_table, write_table, RawTable};
use crate::types::{Origin, RawRow, ReviewRecord};

/// Where an origin's raw exports live
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// Every file matching the pattern, processed in sorted path order
    Glob(String),
    /// One fixed export
    File(PathBuf),
}

/// Raw column names that feed `place` and `comment`, in preference order
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
    pub place: &'static [&'static str],
    pub comment: &'static [&'static str],
}

/// How the `source` tag of a record is produced
#[derive(Debug, Clone, Copy)]
pub enum SourceDeriver {
    Fixed(&'static str),
    /// `"<platform>/<community>"` with the community read per row
    Community {
        platform: &'static str,
        column: &'static str,
        fallback: &'static str,
    },
}

impl SourceDeriver {
    fn derive(&self, table: &RawTable, row: &RawRow) -> String {
        match self {
            SourceDeriver::Fixed(tag) => tag.to_string(),
            SourceDeriver::Community {
                platform,
                column,
                fallback,
            } => {
                let community = if table.has_column(column) {
                    row.get(*column)
                        .and_then(Value::as_str)
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .unwrap_or(*fallback)
                } else {
                    *fallback
                };
                format!("{platform}/{community}")
            }
        }
    }
}

/// How the raw `place` of a record is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceDeriver {
    /// From the first present [`ColumnMap::place`] column; files with none
    /// of those columns fall back to the file name
    Column,
    /// Always from the file name (`Kakadu_Gunlom_Falls.csv` -> `Kakadu Gunlom Falls`)
    FileName,
}

/// Everything that distinguishes one origin's cleaning run from another's
#[derive(Debug, Clone)]
pub struct CleanerConfig {
    pub origin: Origin,
    pub input: RawInput,
    pub columns: ColumnMap,
    pub source: SourceDeriver,
    pub place: PlaceDeriver,
    pub output: PathBuf,
}

/// A raw row mapped onto the record shape, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
    pub source: String,
    pub place: Value,
    pub comment: Value,
}

/// Outcome of one cleaner run
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    pub origin: Option<Origin>,
    pub files_read: usize,
    pub files_skipped: usize,
    pub rows_read: usize,
    /// Raw rows that could not be decoded
    pub rows_skipped: usize,
    pub rows_too_short: usize,
    pub duplicates_removed: usize,
    pub rows_written: usize,
    pub output: PathBuf,
}

/// Place name implied by an export's file name
pub fn place_from_file_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().replace('_', " "))
        .unwrap_or_default()
}

/// Turns one origin's raw exports into an intermediate `source,place,comment` table
pub struct SourceCleaner {
    config: CleanerConfig,
    places: Arc<CanonicalPlaceMap>,
}

impl SourceCleaner {
    pub fn new(config: CleanerConfig, places: Arc<CanonicalPlaceMap>) -> Self {
        Self { config, places }
    }

    pub fn origin(&self) -> Origin {
        self.config.origin
    }

    /// Raw files for this origin. A missing directory or file yields none.
    pub fn input_files(&self) -> Result<Vec<PathBuf>> {
        match &self.config.input {
            RawInput::File(path) => {
                if path.is_file() {
                    Ok(vec![path.clone()])
                } else {
                    warn!("Raw export {} not found, treating as empty", path.display());
                    Ok(Vec::new())
                }
            }
            RawInput::Glob(pattern) => {
                let mut files = Vec::new();
                for entry in glob::glob(pattern)? {
                    match entry {
                        Ok(path) if path.is_file() => files.push(path),
                        Ok(_) => {}
                        Err(e) => warn!("Cannot read glob entry for {}: {}", pattern, e),
                    }
                }
                files.sort();
                if files.is_empty() {
                    warn!("No raw exports match {}, treating as empty", pattern);
                }
                Ok(files)
            }
        }
    }

    /// Map one raw table onto the record shape. `None` when the table has no
    /// comment column and must be skipped as a whole.
    pub fn map_table(&self, table: &RawTable) -> Option<Vec<MappedRow>> {
        let comment_col = table.first_column(self.config.columns.comment)?;
        let place_col = match self.config.place {
            PlaceDeriver::Column => table.first_column(self.config.columns.place),
            PlaceDeriver::FileName => None,
        };
        let file_place = Value::String(place_from_file_name(&table.path));

        let rows = table
            .rows
            .iter()
            .map(|row| MappedRow {
                source: self.config.source.derive(table, row),
                place: match place_col {
                    Some(col) => row.get(col).cloned().unwrap_or(Value::Null),
                    None => file_place.clone(),
                },
                comment: row.get(comment_col).cloned().unwrap_or(Value::Null),
            })
            .collect();
        Some(rows)
    }

    /// Read and map every raw file, skipping the ones that cannot be used
    pub fn load(&self, report: &mut CleanReport) -> Result<Vec<MappedRow>> {
        let origin = self.origin().as_str();
        let mut mapped = Vec::new();

        for path in self.input_files()? {
            let table = match read_raw_table(&path) {
                Ok(table) => table,
                Err(e) => {
                    warn!("Skipping unreadable export {}: {}", path.display(), e);
                    report.files_skipped += 1;
                    metrics::cleaner::file_skipped(origin);
                    continue;
                }
            };

            match self.map_table(&table) {
                Some(rows) => {
                    debug!("{} rows from {}", rows.len(), path.display());
                    report.files_read += 1;
                    report.rows_skipped += table.skipped_rows;
                    metrics::cleaner::file_read(origin);
                    mapped.extend(rows);
                }
                None => {
                    warn!(
                        "Skipping {}: none of the comment columns {:?} present",
                        path.display(),
                        self.config.columns.comment
                    );
                    report.files_skipped += 1;
                    metrics::cleaner::file_skipped(origin);
                }
            }
        }

        report.rows_read = mapped.len();
        metrics::cleaner::rows_read(origin, mapped.len());
        metrics::cleaner::rows_skipped(origin, report.rows_skipped);
        Ok(mapped)
    }

    /// Normalize, filter and deduplicate mapped rows
    pub fn clean_rows(&self, rows: Vec<MappedRow>, report: &mut CleanReport) -> Vec<ReviewRecord> {
        let mut records: Vec<ReviewRecord> = rows
            .into_iter()
            .map(|row| ReviewRecord {
                source: row.source,
                place: self.places.normalize_place_value(&row.place),
                comment: clean_text_value(&row.comment),
            })
            .collect();

        report.rows_too_short = retain_substantive(&mut records);
        let (records, removed) = dedup_records(records);
        report.duplicates_removed = removed;
        records
    }

    /// Run the full cleaning contract and persist the intermediate table
    #[instrument(skip(self), fields(origin = %self.config.origin))]
    pub fn run(&self) -> Result<CleanReport> {
        let started = Instant::now();
        let origin = self.origin().as_str();
        let mut report = CleanReport {
            origin: Some(self.config.origin),
            output: self.config.output.clone(),
            ..CleanReport::default()
        };

        let rows = self.load(&mut report)?;
        let records = self.clean_rows(rows, &mut report);

        write_table(&self.config.output, &records)?;
        report.rows_written = records.len();

        metrics::cleaner::rows_too_short(origin, report.rows_too_short);
        metrics::cleaner::duplicates_removed(origin, report.duplicates_removed);
        metrics::cleaner::rows_written(origin, report.rows_written);
        metrics::stage_duration("clean", started.elapsed().as_secs_f64());

        info!(
            "Cleaned {}: {} read, {} undecodable, {} too short, {} duplicates, {} written to {}",
            origin,
            report.rows_read,
            report.rows_skipped,
            report.rows_too_short,
            report.duplicates_removed,
            report.rows_written,
            report.output.display()
        );
        Ok(report)
    }
}
