// CSV loading for the four season tables.
//
// Pitch rows keep their ids as text; id validation happens in the core
// normalizer so that a malformed id fails the season instead of vanishing.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use plv_core::model::{
    IdentityCrosswalk, RawPitchEvent, SeasonalConstants, SeasonalConstantsTable, WorkloadRecord,
};

use crate::config::DataPaths;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("no seasonal constants for season {season}")]
    MissingSeason { season: i32 },
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Every external table one season needs, as read from disk.
#[derive(Debug, Clone)]
pub struct SeasonTables {
    pub season: i32,
    pub pitches: Vec<RawPitchEvent>,
    pub constants: SeasonalConstantsTable,
    pub workloads: Vec<WorkloadRecord>,
    pub crosswalk: IdentityCrosswalk,
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// One row of the per-season pitch export. Extra columns are ignored.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPitchRow {
    pitch_id: String,
    pitcher_mlb_id: String,
    pitchername: String,
    pitchtype: String,
    PLV: f64,
    #[serde(default)]
    p_hand: Option<String>,
    #[serde(default)]
    b_hand: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawConstantsRow {
    year: i32,
    run_plv_coef: f64,
    run_plv_constant: f64,
}

/// Workload export row. `IP` stays textual for thirds-of-an-inning parsing;
/// `Pitches` may come through a float column.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawWorkloadRow {
    playerid: i64,
    Season: i32,
    IP: String,
    Pitches: f64,
}

/// Register row; either key may be blank.
#[derive(Debug, Deserialize)]
struct RawCrosswalkRow {
    key_mlbam: Option<f64>,
    key_fangraphs: Option<f64>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn integral(value: Option<f64>) -> Option<i64> {
    value
        .filter(|v| v.is_finite() && v.fract() == 0.0)
        .map(|v| v as i64)
}

fn open(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> LoadError + '_ {
    move |e| LoadError::Csv {
        path: path.display().to_string(),
        source: e,
    }
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_pitches_from_reader<R: Read>(rdr: R) -> Result<Vec<RawPitchEvent>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut pitches = Vec::new();
    for result in reader.deserialize::<RawPitchRow>() {
        match result {
            Ok(raw) => {
                if !raw.PLV.is_finite() {
                    warn!("skipping pitch {}: non-finite PLV", raw.pitch_id.trim());
                    continue;
                }
                pitches.push(RawPitchEvent {
                    pitch_id: raw.pitch_id,
                    pitcher_id: raw.pitcher_mlb_id,
                    pitcher_name: raw.pitchername.trim().to_string(),
                    pitch_type: raw.pitchtype.trim().to_string(),
                    plv: raw.PLV,
                    pitcher_hand: non_blank(raw.p_hand),
                    batter_hand: non_blank(raw.b_hand),
                });
            }
            Err(e) => {
                warn!("skipping malformed pitch row: {}", e);
            }
        }
    }
    Ok(pitches)
}

fn load_constants_from_reader<R: Read>(rdr: R) -> Result<SeasonalConstantsTable, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<RawConstantsRow>() {
        match result {
            Ok(raw) => {
                if !raw.run_plv_coef.is_finite() || !raw.run_plv_constant.is_finite() {
                    warn!("skipping constants for {}: non-finite value", raw.year);
                    continue;
                }
                rows.push(SeasonalConstants {
                    season: raw.year,
                    run_value_coefficient: raw.run_plv_coef,
                    run_value_intercept: raw.run_plv_constant,
                });
            }
            Err(e) => {
                warn!("skipping malformed constants row: {}", e);
            }
        }
    }
    Ok(SeasonalConstantsTable::from_rows(rows))
}

fn load_workload_from_reader<R: Read>(rdr: R) -> Result<Vec<WorkloadRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut workloads = Vec::new();
    for result in reader.deserialize::<RawWorkloadRow>() {
        match result {
            Ok(raw) => {
                if !raw.Pitches.is_finite() || raw.Pitches < 0.0 {
                    warn!(
                        "skipping workload for player {} ({}): bad pitch count",
                        raw.playerid, raw.Season
                    );
                    continue;
                }
                workloads.push(WorkloadRecord {
                    external_player_id: raw.playerid,
                    season: raw.Season,
                    innings_pitched: raw.IP.trim().to_string(),
                    season_pitch_count: raw.Pitches.round() as u32,
                });
            }
            Err(e) => {
                warn!("skipping malformed workload row: {}", e);
            }
        }
    }
    Ok(workloads)
}

fn load_crosswalk_from_reader<R: Read>(rdr: R) -> Result<IdentityCrosswalk, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut pairs = Vec::new();
    for result in reader.deserialize::<RawCrosswalkRow>() {
        match result {
            Ok(raw) => pairs.push((integral(raw.key_mlbam), integral(raw.key_fangraphs))),
            Err(e) => {
                warn!("skipping malformed crosswalk row: {}", e);
            }
        }
    }
    Ok(IdentityCrosswalk::from_pairs(pairs))
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load one season's pitch export.
pub fn load_pitches(path: &Path) -> Result<Vec<RawPitchEvent>, LoadError> {
    load_pitches_from_reader(open(path)?).map_err(csv_error(path))
}

/// Load the run-value constants for every season.
pub fn load_seasonal_constants(path: &Path) -> Result<SeasonalConstantsTable, LoadError> {
    load_constants_from_reader(open(path)?).map_err(csv_error(path))
}

/// Load workload records for every season in the file.
pub fn load_workload(path: &Path) -> Result<Vec<WorkloadRecord>, LoadError> {
    load_workload_from_reader(open(path)?).map_err(csv_error(path))
}

pub fn load_crosswalk(path: &Path) -> Result<IdentityCrosswalk, LoadError> {
    load_crosswalk_from_reader(open(path)?).map_err(csv_error(path))
}

/// Load all four tables for `season` from the configured paths.
pub fn load_season_tables(paths: &DataPaths, season: i32) -> Result<SeasonTables, LoadError> {
    let constants = load_seasonal_constants(Path::new(&paths.seasonal_constants))?;
    if constants.for_season(season).is_err() {
        return Err(LoadError::MissingSeason { season });
    }

    let pitches = load_pitches(&paths.pitches_for(season))?;
    if pitches.is_empty() {
        return Err(LoadError::Validation(format!(
            "pitch CSV for {season} produced zero valid rows"
        )));
    }

    let workloads = load_workload(Path::new(&paths.workload))?;
    let crosswalk = load_crosswalk(Path::new(&paths.crosswalk))?;

    info!(
        "loaded season {}: {} pitches, {} workload rows, {} crosswalk ids",
        season,
        pitches.len(),
        workloads.len(),
        crosswalk.len()
    );

    Ok(SeasonTables {
        season,
        pitches,
        constants,
        workloads,
        crosswalk,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
