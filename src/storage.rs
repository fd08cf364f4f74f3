//! Delimited-table persistence for raw exports, intermediate tables and the
//! unified dataset.

use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::CANONICAL_COLUMNS;
use crate::error::{PipelineError, Result};
use crate::types::{RawRow, ReviewRecord};

/// A raw export loaded with its header and all decodable rows
#[derive(Debug, Clone)]
pub struct RawTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    /// Rows that could not be decoded and were dropped
    pub skipped_rows: usize,
}

impl RawTable {
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// First of `candidates` that is a column of this table
    pub fn first_column<'a>(&self, candidates: &[&'a str]) -> Option<&'a str> {
        candidates.iter().copied().find(|c| self.has_column(c))
    }
}

/// Read a raw export. Fails only when the file cannot be opened or has no
/// readable header; individual undecodable rows are skipped and counted.
pub fn read_raw_table(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{FEFF}') } else { h };
            h.trim().to_string()
        })
        .collect();

    let mut rows = Vec::new();
    let mut skipped_rows = 0;

    for (line, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                skipped_rows += 1;
                warn!("Skipping undecodable row {} in {}: {}", line + 1, path.display(), e);
                if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                    break;
                }
                continue;
            }
        };

        let mut row = RawRow::new();
        for (i, header) in headers.iter().enumerate() {
            let cell = match record.get(i) {
                Some(s) if !s.is_empty() => Value::String(s.to_string()),
                _ => Value::Null,
            };
            row.insert(header.clone(), cell);
        }
        rows.push(row);
    }

    debug!("Read {} rows from {}", rows.len(), path.display());

    Ok(RawTable {
        path: path.to_path_buf(),
        headers,
        rows,
        skipped_rows,
    })
}

/// A row of an intermediate table as stored. Empty cells read back as `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoredRow {
    pub source: Option<String>,
    pub place: Option<String>,
    pub comment: Option<String>,
}

impl StoredRow {
    /// Convert to a record; `None` when the comment is missing
    pub fn into_record(self) -> Option<ReviewRecord> {
        let comment = self.comment?;
        Some(ReviewRecord {
            source: self.source.unwrap_or_default(),
            place: self.place.unwrap_or_default(),
            comment,
        })
    }
}

/// Rows of an intermediate table plus the count of rows that failed to decode
#[derive(Debug, Default)]
pub struct StoredTable {
    pub rows: Vec<StoredRow>,
    pub skipped_rows: usize,
}

/// Read an intermediate or unified table written by [`write_table`]
pub fn read_table(path: &Path) -> Result<StoredTable> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut table = StoredTable::default();

    for result in reader.deserialize::<StoredRow>() {
        match result {
            Ok(row) => table.rows.push(row),
            Err(e) => {
                table.skipped_rows += 1;
                warn!("Skipping unreadable row in {}: {}", path.display(), e);
                if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                    break;
                }
            }
        }
    }

    Ok(table)
}

/// Encode records as a `source,place,comment` table. The header is always
/// present, so an empty slice still yields a well-formed table.
pub fn encode_table(records: &[ReviewRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CANONICAL_COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| PipelineError::Io(e.into_error()))
}

/// Write a table, creating the parent directory as needed.
/// Returns the hex SHA-256 of the bytes written.
pub fn write_table(path: &Path, records: &[ReviewRecord]) -> Result<String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let bytes = encode_table(records)?;
    fs::write(path, &bytes)?;

    debug!("Wrote {} rows to {}", records.len(), path.display());
    Ok(hex::encode(Sha256::digest(&bytes)))
}
