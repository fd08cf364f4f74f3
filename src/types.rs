use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    GOOGLE_MAPS_INTERMEDIATE, GOOGLE_MAPS_ORIGIN, MIN_COMMENT_CHARS, REDDIT_INTERMEDIATE,
    REDDIT_ORIGIN, TRIPADVISOR_INTERMEDIATE, TRIPADVISOR_ORIGIN,
};

/// One raw row as read from a source export: header -> cell.
/// Empty cells and cells past the end of a short row are `Value::Null`.
pub type RawRow = serde_json::Map<String, serde_json::Value>;

/// The unit flowing through every stage. Field order is the table column order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub source: String,
    pub place: String,
    pub comment: String,
}

impl ReviewRecord {
    pub fn new(
        source: impl Into<String>,
        place: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            place: place.into(),
            comment: comment.into(),
        }
    }

    /// True when the comment is long enough to keep (counted in characters)
    pub fn has_substantive_comment(&self) -> bool {
        self.comment.chars().count() > MIN_COMMENT_CHARS
    }
}

/// The three independent review providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    #[value(name = "tripadvisor")]
    TripAdvisor,
    #[value(name = "google_maps")]
    GoogleMaps,
    #[value(name = "reddit")]
    Reddit,
}

impl Origin {
    /// Concatenation order used by the merger
    pub const MERGE_ORDER: [Origin; 3] = [Origin::TripAdvisor, Origin::GoogleMaps, Origin::Reddit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::TripAdvisor => TRIPADVISOR_ORIGIN,
            Origin::GoogleMaps => GOOGLE_MAPS_ORIGIN,
            Origin::Reddit => REDDIT_ORIGIN,
        }
    }

    pub fn intermediate_file_name(&self) -> &'static str {
        match self {
            Origin::TripAdvisor => TRIPADVISOR_INTERMEDIATE,
            Origin::GoogleMaps => GOOGLE_MAPS_INTERMEDIATE,
            Origin::Reddit => REDDIT_INTERMEDIATE,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
