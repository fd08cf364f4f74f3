use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::{
    CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE, DEFAULT_GOOGLE_MAPS_RAW, DEFAULT_INTERMEDIATE_DIR,
    DEFAULT_REDDIT_RAW, DEFAULT_SHUFFLE_SEED, DEFAULT_TRIPADVISOR_RAW, DEFAULT_UNIFIED_OUTPUT,
};
use crate::error::{PipelineError, Result};
use crate::normalize::CanonicalPlaceMap;
use crate::pipeline::merger::MergerConfig;
use crate::types::Origin;

/// Pipeline configuration. Every field has a built-in default, so an absent
/// or partial `config.toml` is valid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub paths: PathsConfig,
    pub merge: MergeSettings,
    pub places: PlacesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// The single TripAdvisor export
    pub tripadvisor_raw: PathBuf,
    /// Glob over Google Maps exports
    pub google_maps_raw: String,
    /// Glob over per-location Reddit exports
    pub reddit_raw: String,
    pub intermediate_dir: PathBuf,
    pub unified_output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            tripadvisor_raw: PathBuf::from(DEFAULT_TRIPADVISOR_RAW),
            google_maps_raw: DEFAULT_GOOGLE_MAPS_RAW.to_string(),
            reddit_raw: DEFAULT_REDDIT_RAW.to_string(),
            intermediate_dir: PathBuf::from(DEFAULT_INTERMEDIATE_DIR),
            unified_output: PathBuf::from(DEFAULT_UNIFIED_OUTPUT),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeSettings {
    pub seed: u64,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SHUFFLE_SEED,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacesConfig {
    /// Extra alias -> canonical name entries on top of the built-in table
    pub aliases: BTreeMap<String, String>,
}

impl Config {
    /// Config file to use: explicit path, else `$REVIEWS_CONFIG`, else `config.toml`
    pub fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load from `path`; a missing file means defaults, a malformed one is an error
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Built-in place table plus configured aliases
    pub fn place_map(&self) -> Result<CanonicalPlaceMap> {
        CanonicalPlaceMap::builtin().with_aliases(&self.places.aliases)
    }

    pub fn intermediate_path(&self, origin: Origin) -> PathBuf {
        self.paths
            .intermediate_dir
            .join(origin.intermediate_file_name())
    }

    pub fn merger_config(&self) -> MergerConfig {
        MergerConfig {
            intermediate_dir: self.paths.intermediate_dir.clone(),
            output: self.paths.unified_output.clone(),
            seed: self.merge.seed,
        }
    }
}
