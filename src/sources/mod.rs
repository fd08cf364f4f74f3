// Per-origin cleaner definitions. Each origin differs only in where its raw
// exports live, which columns carry place and comment, and how `source` is tagged.

pub mod google_maps;
pub mod reddit;
pub mod tripadvisor;

use crate::config::Config;
use crate::pipeline::cleaner::CleanerConfig;
use crate::types::Origin;

/// Cleaner definition for `origin` with paths taken from `config`
pub fn cleaner_config(origin: Origin, config: &Config) -> CleanerConfig {
    let output = config.intermediate_path(origin);
    match origin {
        Origin::TripAdvisor => {
            tripadvisor::cleaner_config(config.paths.tripadvisor_raw.clone(), output)
        }
        Origin::GoogleMaps => {
            google_maps::cleaner_config(config.paths.google_maps_raw.clone(), output)
        }
        Origin::Reddit => reddit::cleaner_config(config.paths.reddit_raw.clone(), output),
    }
}
