// PLA (Pitch Level Average): expected runs per nine equivalent innings,
// for each pitcher overall and for each pitch type in the arsenal.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::model::PitchType;
use crate::workload::JoinedPitchType;

/// Innings in a regulation game; PLA is expressed on this scale.
pub const INNINGS_PER_GAME: f64 = 9.0;

/// One reportable row per pitcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitcherSeasonSummary {
    pub pitcher_id: i64,
    pub pitcher_name: String,
    pub season_pitch_count: u32,
    pub season_innings_pitched: f64,
    /// PLA. `None` when the pitcher has zero recorded innings.
    pub season_rate_stat: Option<f64>,
    /// Per-pitch-type PLA. Pitch types without a usable value are absent.
    pub pitch_type_rates: BTreeMap<PitchType, f64>,
}

impl PitcherSeasonSummary {
    pub fn pitch_type_rate(&self, pitch_type: PitchType) -> Option<f64> {
        self.pitch_type_rates.get(&pitch_type).copied()
    }

    /// Per-pitch-type PLA in [`PitchType::REPORT_ORDER`].
    pub fn report_rates(&self) -> [Option<f64>; 7] {
        PitchType::REPORT_ORDER.map(|pt| self.pitch_type_rate(pt))
    }
}

/// `runs * 9 / innings`, undefined for non-positive innings.
pub fn runs_per_nine(runs: f64, innings: f64) -> Option<f64> {
    if innings <= 0.0 {
        return None;
    }
    let rate = runs * INNINGS_PER_GAME / innings;
    rate.is_finite().then_some(rate)
}

/// Pivot joined pitch-type rows into one summary per pitcher.
///
/// The season rate sums run value over the retained pitch types only. Per
/// pitch type values are summed when a pitcher has more than one row for the
/// same type, and a resulting zero is treated as missing rather than as a
/// perfect rate.
///
/// Pitchers come out in order of first appearance in `joined`.
pub fn compute_pla(joined: &[JoinedPitchType]) -> Vec<PitcherSeasonSummary> {
    struct Accum<'a> {
        first: &'a JoinedPitchType,
        total_runs: f64,
        per_type: BTreeMap<PitchType, f64>,
    }

    let mut order: Vec<i64> = Vec::new();
    let mut by_pitcher: BTreeMap<i64, Accum> = BTreeMap::new();

    for row in joined {
        let id = row.summary.pitcher_id;
        let acc = by_pitcher.entry(id).or_insert_with(|| {
            order.push(id);
            Accum {
                first: row,
                total_runs: 0.0,
                per_type: BTreeMap::new(),
            }
        });
        acc.total_runs += row.summary.summed_run_value;
        let rate = row
            .pitchtype_innings_proxy
            .and_then(|proxy| runs_per_nine(row.summary.summed_run_value, proxy))
            .unwrap_or(0.0);
        *acc.per_type.entry(row.summary.pitch_type).or_insert(0.0) += rate;
    }

    let summaries: Vec<PitcherSeasonSummary> = order
        .into_iter()
        .filter_map(|id| by_pitcher.remove(&id))
        .map(|acc| PitcherSeasonSummary {
            pitcher_id: acc.first.summary.pitcher_id,
            pitcher_name: acc.first.summary.pitcher_name.clone(),
            season_pitch_count: acc.first.season_pitch_count,
            season_innings_pitched: acc.first.season_innings_pitched,
            season_rate_stat: runs_per_nine(acc.total_runs, acc.first.season_innings_pitched),
            pitch_type_rates: acc
                .per_type
                .into_iter()
                .filter(|(_, rate)| *rate != 0.0 && rate.is_finite())
                .collect(),
        })
        .collect();

    debug!("computed PLA for {} pitchers", summaries.len());
    summaries
}
