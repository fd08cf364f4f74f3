use anyhow::Result;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

use dark_sky_reviews::config::Config;
use dark_sky_reviews::pipeline::{self, report_path};
use dark_sky_reviews::storage::{read_table, StoredRow};
use dark_sky_reviews::{Origin, ReviewRecord};

fn config_for(root: &Path) -> Config {
    let mut config = Config::default();
    config.paths.tripadvisor_raw = root.join("raw/tripadvisor.csv");
    config.paths.google_maps_raw = root.join("raw/googlemaps/*.csv").to_string_lossy().to_string();
    config.paths.reddit_raw = root.join("raw/reddit/*.csv").to_string_lossy().to_string();
    config.paths.intermediate_dir = root.join("interim");
    config.paths.unified_output = root.join("processed/reviews_unified.csv");
    config
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn records(path: &Path) -> Vec<ReviewRecord> {
    read_table(path)
        .unwrap()
        .rows
        .into_iter()
        .filter_map(StoredRow::into_record)
        .collect()
}

fn seed_raw_exports(root: &Path) {
    write(
        &root.join("raw/tripadvisor.csv"),
        "place_name,text,rating,date_iso\n\
         Uluru,Amazing sunset view here,5,2024-05-01\n\
         Kakadu National Park,ok,2,2024-05-02\n\
         Nitmiluk,Gorge cruise then the whole Milky Way,5,2024-05-03\n",
    );
    write(
        &root.join("raw/googlemaps/reviews.csv"),
        "nama_tempat,user,review,rating\n\
         Ayers Rock,kim,Amazing sunset view here,5\n\
         Kata Tjuta,lee,Windy but clear skies all night,4\n\
         Kata Tjuta,lee,Windy but clear skies all night,4\n",
    );
    write(
        &root.join("raw/reddit/Nitmiluk_Katherine_Gorge.csv"),
        "submission_id,comment_id,subreddit,author,created_utc,comment_body\n\
         a,b,australia,x,1,We camped at the gorge and saw shooting stars\n\
         a,c,australia,y,2,lol\n",
    );
    write(&root.join("raw/reddit/Broken.csv"), "subreddit,author\naustralia,z\n");
}

#[tokio::test]
async fn test_full_run_cleans_and_merges_every_origin() -> Result<()> {
    let dir = tempdir()?;
    let root = dir.path();
    seed_raw_exports(root);
    let config = config_for(root);
    let places = Arc::new(config.place_map()?);

    let report = pipeline::run_all(&config, places, &Origin::MERGE_ORDER).await?;

    assert_eq!(report.cleaners.len(), 3);
    let reddit = &report.cleaners[2];
    assert_eq!(reddit.files_read, 1);
    assert_eq!(reddit.files_skipped, 1);
    assert_eq!(reddit.rows_written, 1);

    assert_eq!(
        report.merge.tables_read,
        vec![Origin::TripAdvisor, Origin::GoogleMaps, Origin::Reddit]
    );
    let sum_of_tables: usize = report.cleaners.iter().map(|c| c.rows_written).sum();
    assert!(report.merge.rows_written <= sum_of_tables);

    let unified = records(&config.paths.unified_output);
    assert_eq!(unified.len(), report.merge.rows_written);
    assert_eq!(unified.len(), 5);

    // same text from two sources is not a duplicate triplet
    let sunset: Vec<_> = unified
        .iter()
        .filter(|r| r.comment == "Amazing sunset view here")
        .collect();
    assert_eq!(sunset.len(), 2);
    assert!(sunset.iter().all(|r| r.place == "Uluru-Kata Tjuta"));

    assert!(unified.iter().all(|r| r.comment.chars().count() > 5));
    let unique: HashSet<_> = unified.iter().collect();
    assert_eq!(unique.len(), unified.len());

    assert!(report_path(&config.paths.unified_output).is_file());
    Ok(())
}

#[tokio::test]
async fn test_run_with_no_raw_data_yields_empty_tables() -> Result<()> {
    let dir = tempdir()?;
    let config = config_for(dir.path());
    let places = Arc::new(config.place_map()?);

    let report = pipeline::run_all(&config, places, &Origin::MERGE_ORDER).await?;

    for origin in Origin::MERGE_ORDER {
        let content = fs::read_to_string(config.intermediate_path(origin))?;
        assert_eq!(content, "source,place,comment\n");
    }
    assert_eq!(report.merge.rows_written, 0);
    assert_eq!(
        fs::read_to_string(&config.paths.unified_output)?,
        "source,place,comment\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_rerunning_one_cleaner_leaves_others_untouched() -> Result<()> {
    let dir = tempdir()?;
    let root = dir.path();
    seed_raw_exports(root);
    let config = config_for(root);
    let places = Arc::new(config.place_map()?);

    pipeline::run_all(&config, places.clone(), &Origin::MERGE_ORDER).await?;
    let google_before = fs::read(config.intermediate_path(Origin::GoogleMaps))?;

    let cleaners = pipeline::build_cleaners(&config, places, &[Origin::Reddit]);
    let reports = pipeline::run_cleaners(cleaners).await?;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].origin, Some(Origin::Reddit));

    assert_eq!(fs::read(config.intermediate_path(Origin::GoogleMaps))?, google_before);
    Ok(())
}
