//! Google Maps review exports: any number of CSVs with
//! `nama_tempat, user, review, rating` (or already-renamed `place, comment`).

use std::path::PathBuf;

use crate::constants::GOOGLE_MAPS_SOURCE;
use crate::pipeline::cleaner::{CleanerConfig, ColumnMap, PlaceDeriver, RawInput, SourceDeriver};
use crate::types::Origin;

pub const COLUMNS: ColumnMap = ColumnMap {
    place: &["nama_tempat", "place"],
    comment: &["review", "comment"],
};

pub fn cleaner_config(raw_glob: impl Into<String>, output: PathBuf) -> CleanerConfig {
    CleanerConfig {
        origin: Origin::GoogleMaps,
        input: RawInput::Glob(raw_glob.into()),
        columns: COLUMNS,
        source: SourceDeriver::Fixed(GOOGLE_MAPS_SOURCE),
        place: PlaceDeriver::Column,
        output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::CanonicalPlaceMap;
    use crate::pipeline::cleaner::SourceCleaner;
    use crate::storage::read_table;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_google_exports_are_concatenated_and_deduplicated() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("01_uluru.csv"),
            "nama_tempat,user,review,rating\n\
             Uluru,ana,Sunrise over the rock was magical,5\n\
             Ayers Rock,ben,Flies everywhere,2\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("02_more.csv"),
            "nama_tempat,user,review,rating\n\
             ULURU,ana,Sunrise over the rock  was magical,5\n\
             Kakadu National Park,dev,Nice,3\n",
        )
        .unwrap();
        let glob = dir.path().join("*.csv").to_string_lossy().to_string();
        let out = dir.path().join("google_clean.csv");
        let cleaner = SourceCleaner::new(
            cleaner_config(glob, out.clone()),
            Arc::new(CanonicalPlaceMap::builtin()),
        );

        let report = cleaner.run().unwrap();
        assert_eq!(report.files_read, 2);
        assert_eq!(report.rows_read, 4);
        assert_eq!(report.rows_too_short, 1);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(report.rows_written, 2);

        let rows = read_table(&out).unwrap().rows;
        assert!(rows.iter().all(|r| r.source.as_deref() == Some("GoogleMaps")));
        assert!(rows
            .iter()
            .all(|r| r.place.as_deref() == Some("Uluru-Kata Tjuta")));
    }

    #[test]
    fn test_missing_google_directory_is_empty_not_an_error() {
        let dir = tempdir().unwrap();
        let glob = dir.path().join("nope/*.csv").to_string_lossy().to_string();
        let out = dir.path().join("google_clean.csv");
        let cleaner = SourceCleaner::new(
            cleaner_config(glob, out.clone()),
            Arc::new(CanonicalPlaceMap::builtin()),
        );

        let report = cleaner.run().unwrap();
        assert_eq!(report.files_read, 0);
        assert_eq!(fs::read_to_string(out).unwrap(), "source,place,comment\n");
    }
}
