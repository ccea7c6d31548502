// Configuration loading and parsing (plv.toml, data.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use plv_core::card::CardThresholds;

/// Placeholder in the pitch-file template that is replaced with the season.
pub const SEASON_PLACEHOLDER: &str = "{season}";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub seasons: SeasonsConfig,
    pub thresholds: ThresholdsConfig,
    pub output: OutputConfig,
    pub data_paths: DataPaths,
}

// ---------------------------------------------------------------------------
// plv.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct PlvFile {
    seasons: SeasonsConfig,
    thresholds: ThresholdsConfig,
    output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonsConfig {
    pub available: Vec<i32>,
    pub default: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    pub pla_min_pitches: u32,
    pub pitcher_list_min_pitches: u32,
    pub arsenal_min_pitches: u32,
    pub quality_min_pitches: u32,
    pub card_overall_min_pitches: u32,
    pub card_pitch_type_min_pitches: u32,
}

impl ThresholdsConfig {
    pub fn card(&self) -> CardThresholds {
        CardThresholds {
            overall_min_pitches: self.card_overall_min_pitches,
            pitch_type_min_pitches: self.card_pitch_type_min_pitches,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: String,
}

// ---------------------------------------------------------------------------
// data.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[data_paths]` table in data.toml.
#[derive(Debug, Clone, Deserialize)]
struct DataFile {
    data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    /// Per-season pitch file; must contain `{season}`.
    pub pitches: String,
    pub seasonal_constants: String,
    pub workload: String,
    pub crosswalk: String,
}

impl DataPaths {
    pub fn pitches_for(&self, season: i32) -> PathBuf {
        PathBuf::from(self.pitches.replace(SEASON_PLACEHOLDER, &season.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/plv.toml` and
/// `config/data.toml`, both relative to the given `base_dir`.
///
/// This does not copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let plv_path = config_dir.join("plv.toml");
    let plv_text = read_file(&plv_path)?;
    let plv_file: PlvFile = toml::from_str(&plv_text).map_err(|e| ConfigError::ParseError {
        path: plv_path.clone(),
        source: e,
    })?;

    let data_path = config_dir.join("data.toml");
    let data_text = read_file(&data_path)?;
    let data_file: DataFile = toml::from_str(&data_text).map_err(|e| ConfigError::ParseError {
        path: data_path.clone(),
        source: e,
    })?;

    let config = Config {
        seasons: plv_file.seasons,
        thresholds: plv_file.thresholds,
        output: plv_file.output,
        data_paths: data_file.data_paths,
    };

    validate(&config)?;

    Ok(config)
}

/// The files `load_config_from` reads out of `config/`.
const CONFIG_FILES: [&str; 2] = ["plv.toml", "data.toml"];

/// Seed `config/` from `defaults/` with whichever of plv.toml and data.toml
/// it lacks. Files already in `config/` are never overwritten. Returns the
/// seeded paths.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() && !config_dir.is_dir() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither defaults/ nor config/ found in {}",
                base_dir.display()
            ),
        });
    }

    let missing: Vec<&str> = CONFIG_FILES
        .into_iter()
        .filter(|name| !config_dir.join(name).is_file())
        .collect();
    if missing.is_empty() {
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("cannot create {}: {e}", config_dir.display()),
    })?;

    missing
        .into_iter()
        .map(|name| seed_file(&defaults_dir.join(name), &config_dir.join(name)))
        .collect()
}

fn seed_file(source: &Path, target: &Path) -> Result<PathBuf, ConfigError> {
    std::fs::copy(source, target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("cannot seed {} from {}: {e}", target.display(), source.display()),
    })?;
    info!("Seeded {} from {}", target.display(), source.display());
    Ok(target.to_path_buf())
}

/// Loads config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.seasons.available.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "seasons.available".into(),
            message: "must list at least one season".into(),
        });
    }

    if !config.seasons.available.contains(&config.seasons.default) {
        return Err(ConfigError::ValidationError {
            field: "seasons.default".into(),
            message: format!(
                "{} is not one of the available seasons {:?}",
                config.seasons.default, config.seasons.available
            ),
        });
    }

    let t = &config.thresholds;
    let threshold_fields: &[(&str, u32)] = &[
        ("thresholds.pla_min_pitches", t.pla_min_pitches),
        ("thresholds.pitcher_list_min_pitches", t.pitcher_list_min_pitches),
        ("thresholds.arsenal_min_pitches", t.arsenal_min_pitches),
        ("thresholds.quality_min_pitches", t.quality_min_pitches),
        ("thresholds.card_overall_min_pitches", t.card_overall_min_pitches),
        ("thresholds.card_pitch_type_min_pitches", t.card_pitch_type_min_pitches),
    ];
    for (name, val) in threshold_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    if !config.data_paths.pitches.contains(SEASON_PLACEHOLDER) {
        return Err(ConfigError::ValidationError {
            field: "data_paths.pitches".into(),
            message: format!("must contain the {SEASON_PLACEHOLDER} placeholder"),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
