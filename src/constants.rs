/// Origin names used on the command line and in logs
pub const TRIPADVISOR_ORIGIN: &str = "tripadvisor";
pub const GOOGLE_MAPS_ORIGIN: &str = "google_maps";
pub const REDDIT_ORIGIN: &str = "reddit";

// Fixed `source` tags written into every record
pub const TRIPADVISOR_SOURCE: &str = "TripAdvisor";
pub const GOOGLE_MAPS_SOURCE: &str = "GoogleMaps";
pub const REDDIT_PLATFORM: &str = "Reddit";
/// Community used when a Reddit export carries no subreddit
pub const REDDIT_FALLBACK_COMMUNITY: &str = "reddit";

// Intermediate table file names (one per origin)
pub const TRIPADVISOR_INTERMEDIATE: &str = "tripadvisor_clean.csv";
pub const GOOGLE_MAPS_INTERMEDIATE: &str = "google_clean.csv";
pub const REDDIT_INTERMEDIATE: &str = "reddit_clean.csv";

// Default raw input locations
pub const DEFAULT_TRIPADVISOR_RAW: &str =
    "data/raw_data/australian_dark_sky_reviews_final_clean_FIXED2.csv";
pub const DEFAULT_GOOGLE_MAPS_RAW: &str = "data/raw_data/googlemaps/*.csv";
pub const DEFAULT_REDDIT_RAW: &str = "data/raw_data/Reddit_comment/*.csv";

// Default output locations
pub const DEFAULT_INTERMEDIATE_DIR: &str = "data/interim";
pub const DEFAULT_UNIFIED_OUTPUT: &str = "data/processed/reviews_unified.csv";
pub const RUN_REPORT_FILE: &str = "run_report.json";

/// Column order of every intermediate and unified table
pub const CANONICAL_COLUMNS: [&str; 3] = ["source", "place", "comment"];

/// A comment is kept only when its cleaned length is strictly greater than this
pub const MIN_COMMENT_CHARS: usize = 5;

/// Seed for the unified-table shuffle
pub const DEFAULT_SHUFFLE_SEED: u64 = 42;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const CONFIG_ENV_VAR: &str = "REVIEWS_CONFIG";
