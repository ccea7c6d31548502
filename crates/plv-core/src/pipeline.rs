// Season pipeline: the single entry point every report goes through.
//
// Steps:
// 1. Normalize raw pitches (id coercion, rare pitch types out, order by id)
// 2. Attach run value and quality tier with the season's constants
// 3. Aggregate per pitcher and pitch type (>= 20 pitches)
// 4. Join season workload through the identity crosswalk
// 5. Compute overall and per-pitch-type PLA
// 6. Apply the caller's minimum-pitch cutoff

use serde::Serialize;
use tracing::info;

use crate::aggregate::aggregate_pitch_types;
use crate::error::PipelineError;
use crate::model::{IdentityCrosswalk, RawPitchEvent, SeasonalConstantsTable, WorkloadRecord};
use crate::normalize::normalize;
use crate::pla::{compute_pla, PitcherSeasonSummary};
use crate::run_value::{value_pitches, ValuedPitch};
use crate::threshold::filter_reportable;
use crate::workload::{join_workload, JoinGap, JoinedPitchType};

/// Borrowed view of every external table one season needs.
#[derive(Debug, Clone, Copy)]
pub struct SeasonInputs<'a> {
    pub season: i32,
    pub pitches: &'a [RawPitchEvent],
    pub constants: &'a SeasonalConstantsTable,
    pub workloads: &'a [WorkloadRecord],
    pub crosswalk: &'a IdentityCrosswalk,
}

/// PLA-bearing output of steps 3-6.
#[derive(Debug, Clone, Serialize)]
pub struct PlaReport {
    pub season: i32,
    pub min_pitches: u32,
    pub pitch_types: Vec<JoinedPitchType>,
    pub pitchers: Vec<PitcherSeasonSummary>,
    pub join_gaps: Vec<JoinGap>,
}

/// Everything the presentation layer needs for one season.
#[derive(Debug, Clone)]
pub struct SeasonReport {
    pub valued: Vec<ValuedPitch>,
    pub pla: PlaReport,
}

/// Steps 1-2: the valued pitch table used for PLV-only reporting.
pub fn value_season(
    season: i32,
    raw: &[RawPitchEvent],
    constants: &SeasonalConstantsTable,
) -> Result<Vec<ValuedPitch>, PipelineError> {
    let events = normalize(raw)?;
    value_pitches(events, season, constants)
}

/// Steps 3-6 over an already valued pitch table.
pub fn pla_report(
    season: i32,
    valued: &[ValuedPitch],
    workloads: &[WorkloadRecord],
    crosswalk: &IdentityCrosswalk,
    min_pitches: u32,
) -> Result<PlaReport, PipelineError> {
    let summaries = aggregate_pitch_types(valued);
    let joined = join_workload(&summaries, workloads, crosswalk, season)?;
    let pitchers = filter_reportable(compute_pla(&joined.rows), min_pitches);

    info!(
        "season {}: {} pitchers reportable at >= {} pitches, {} without workload",
        season,
        pitchers.len(),
        min_pitches,
        joined.gaps.len()
    );

    Ok(PlaReport {
        season,
        min_pitches,
        pitch_types: joined.rows,
        pitchers,
        join_gaps: joined.gaps,
    })
}

/// Run the full pipeline for one season.
pub fn run_season(inputs: SeasonInputs<'_>, min_pitches: u32) -> Result<SeasonReport, PipelineError> {
    let valued = value_season(inputs.season, inputs.pitches, inputs.constants)?;
    let pla = pla_report(
        inputs.season,
        &valued,
        inputs.workloads,
        inputs.crosswalk,
        min_pitches,
    )?;
    Ok(SeasonReport { valued, pla })
}
