// Per-season memoization of loaded and valued pitch data.
//
// Loading a season reads several large CSVs and values every pitch; reports
// for the same season share one copy.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use plv_core::model::{IdentityCrosswalk, WorkloadRecord};
use plv_core::pipeline::{pla_report, value_season, PlaReport};
use plv_core::run_value::ValuedPitch;
use plv_core::PipelineError;

use crate::config::DataPaths;
use crate::loaders::{load_season_tables, LoadError, SeasonTables};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Where season tables come from.
pub trait SeasonSource {
    fn load(&self, season: i32) -> Result<SeasonTables, LoadError>;
}

/// Reads season tables from the configured CSV paths.
#[derive(Debug, Clone)]
pub struct CsvSource {
    paths: DataPaths,
}

impl CsvSource {
    pub fn new(paths: DataPaths) -> Self {
        Self { paths }
    }
}

impl SeasonSource for CsvSource {
    fn load(&self, season: i32) -> Result<SeasonTables, LoadError> {
        load_season_tables(&self.paths, season)
    }
}

/// A season after normalization and valuation.
#[derive(Debug, Clone)]
pub struct SeasonData {
    pub season: i32,
    pub valued: Vec<ValuedPitch>,
    pub workloads: Vec<WorkloadRecord>,
    pub crosswalk: IdentityCrosswalk,
}

impl SeasonData {
    pub fn from_tables(tables: SeasonTables) -> Result<Self, PipelineError> {
        let valued = value_season(tables.season, &tables.pitches, &tables.constants)?;
        Ok(Self {
            season: tables.season,
            valued,
            workloads: tables.workloads,
            crosswalk: tables.crosswalk,
        })
    }

    /// PLA table for this season at the given pitch cutoff.
    pub fn pla(&self, min_pitches: u32) -> Result<PlaReport, PipelineError> {
        pla_report(
            self.season,
            &self.valued,
            &self.workloads,
            &self.crosswalk,
            min_pitches,
        )
    }
}

pub struct SeasonCache<S> {
    source: S,
    seasons: HashMap<i32, Arc<SeasonData>>,
}

impl<S: SeasonSource> SeasonCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            seasons: HashMap::new(),
        }
    }

    /// Return the cached season, loading and valuing it on first use.
    ///
    /// A failed load leaves nothing behind, so the next call retries.
    pub fn get_or_load(&mut self, season: i32) -> Result<Arc<SeasonData>, CacheError> {
        if let Some(data) = self.seasons.get(&season) {
            debug!("season {} served from cache", season);
            return Ok(Arc::clone(data));
        }

        let tables = self.source.load(season)?;
        let data = Arc::new(SeasonData::from_tables(tables)?);
        info!("season {} cached ({} valued pitches)", season, data.valued.len());
        self.seasons.insert(season, Arc::clone(&data));
        Ok(data)
    }

    pub fn is_cached(&self, season: i32) -> bool {
        self.seasons.contains_key(&season)
    }

    pub fn invalidate(&mut self, season: i32) -> bool {
        self.seasons.remove(&season).is_some()
    }

    pub fn clear(&mut self) {
        self.seasons.clear();
    }
}
