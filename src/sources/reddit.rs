//! Reddit comment exports: one CSV per location, named after the location
//! (`Nitmiluk_Katherine_Gorge.csv`), with columns such as
//! `submission_id, comment_id, subreddit, author, created_utc, comment_body`.

use std::path::PathBuf;

use crate::constants::{REDDIT_FALLBACK_COMMUNITY, REDDIT_PLATFORM};
use crate::pipeline::cleaner::{CleanerConfig, ColumnMap, PlaceDeriver, RawInput, SourceDeriver};
use crate::types::Origin;

pub const COMMUNITY_COLUMN: &str = "subreddit";

pub const COLUMNS: ColumnMap = ColumnMap {
    place: &[],
    comment: &["comment_body", "comment"],
};

pub fn cleaner_config(raw_glob: impl Into<String>, output: PathBuf) -> CleanerConfig {
    CleanerConfig {
        origin: Origin::Reddit,
        input: RawInput::Glob(raw_glob.into()),
        columns: COLUMNS,
        source: SourceDeriver::Community {
            platform: REDDIT_PLATFORM,
            column: COMMUNITY_COLUMN,
            fallback: REDDIT_FALLBACK_COMMUNITY,
        },
        place: PlaceDeriver::FileName,
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
    fn test_reddit_source_and_place_come_from_row_and_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Nitmiluk_Katherine_Gorge.csv"),
            "submission_id,comment_id,subreddit,author,created_utc,comment_body\n\
             s1,c1,australia,alice,1700000000,Went on the night cruise and the stars were unreal\n\
             s1,c2,travel,bob,1700000100,Katherine Gorge at night is special\n\
             s2,c3,,carol,1700000200,No subreddit on this one somehow\n",
        )
        .unwrap();
        let glob = dir.path().join("*.csv").to_string_lossy().to_string();
        let out = dir.path().join("reddit_clean.csv");
        let cleaner = SourceCleaner::new(
            cleaner_config(glob, out.clone()),
            Arc::new(CanonicalPlaceMap::builtin()),
        );

        let report = cleaner.run().unwrap();
        assert_eq!(report.rows_written, 3);

        let rows = read_table(&out).unwrap().rows;
        let sources: Vec<_> = rows.iter().filter_map(|r| r.source.clone()).collect();
        assert_eq!(sources, vec!["Reddit/australia", "Reddit/travel", "Reddit/reddit"]);
        assert!(rows
            .iter()
            .all(|r| r.place.as_deref() == Some("Nitmiluk (Katherine Gorge)")));
    }

    #[test]
    fn test_reddit_accepts_plain_comment_column() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Devils_Marbles.csv"),
            "comment\nThe boulders glow at sunset\n",
        )
        .unwrap();
        let glob = dir.path().join("*.csv").to_string_lossy().to_string();
        let cleaner = SourceCleaner::new(
            cleaner_config(glob, dir.path().join("out.csv")),
            Arc::new(CanonicalPlaceMap::builtin()),
        );

        let mut report = Default::default();
        let rows = cleaner.load(&mut report).unwrap();
        let records = cleaner.clean_rows(rows, &mut report);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, "Reddit/reddit");
        assert_eq!(records[0].place, "Devils Marbles (Karlu Karlu)");
    }
}
