//! The TripAdvisor export: a single CSV with
//! `place_name, text, rating, date_iso, ...`.

use std::path::PathBuf;

use crate::constants::TRIPADVISOR_SOURCE;
use crate::pipeline::cleaner::{CleanerConfig, ColumnMap, PlaceDeriver, RawInput, SourceDeriver};
use crate::types::Origin;

pub const COLUMNS: ColumnMap = ColumnMap {
    place: &["place_name", "place"],
    comment: &["text", "comment"],
};

pub fn cleaner_config(raw_file: PathBuf, output: PathBuf) -> CleanerConfig {
    CleanerConfig {
        origin: Origin::TripAdvisor,
        input: RawInput::File(raw_file),
        columns: COLUMNS,
        source: SourceDeriver::Fixed(TRIPADVISOR_SOURCE),
        place: PlaceDeriver::Column,
        output,
    }
}
