// Arsenal distribution: one pitcher's PLV by pitch type against a chosen set
// of batters, next to the league average for the same matchup.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::aggregate::MIN_PITCH_TYPE_COUNT;
use crate::model::{HandFilter, Handedness, PitchType};
use crate::percentile::mean;
use crate::run_value::ValuedPitch;

/// Histogram range and bin width for PLV distributions.
pub const PLV_MIN: f64 = 0.0;
pub const PLV_MAX: f64 = 10.0;
pub const PLV_BIN_WIDTH: f64 = 0.5;
pub const PLV_BINS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArsenalEntry {
    pub pitch_type: PitchType,
    pub pitch_count: u32,
    /// Share of the pitcher's filtered pitches, rounded to one decimal.
    pub usage_pct: f64,
    pub mean_plv: f64,
    /// League mean for this pitch type against the same batters, thrown by
    /// pitchers of matching hand.
    pub league_mean_plv: Option<f64>,
    /// Counts of PLV (clipped to 0-10) in bins of width 0.5.
    pub histogram: [u32; PLV_BINS],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arsenal {
    pub pitcher_name: String,
    pub hand_filter: HandFilter,
    pub pitches_thrown: u32,
    pub pitcher_hands: Vec<Handedness>,
    /// Pitch types with at least 20 filtered pitches, most used first.
    pub entries: Vec<ArsenalEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ArsenalReport {
    NotEnoughPitches { pitches_thrown: u32, threshold: u32 },
    Arsenal(Arsenal),
}

/// Bin index of a PLV value after clipping to [0, 10]; 10 lands in the last bin.
pub fn plv_bin(plv: f64) -> usize {
    let clipped = plv.clamp(PLV_MIN, PLV_MAX);
    ((clipped / PLV_BIN_WIDTH).floor() as usize).min(PLV_BINS - 1)
}

pub fn plv_histogram<'a>(plvs: impl IntoIterator<Item = &'a f64>) -> [u32; PLV_BINS] {
    let mut bins = [0u32; PLV_BINS];
    for plv in plvs {
        if plv.is_finite() {
            bins[plv_bin(*plv)] += 1;
        }
    }
    bins
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Build the arsenal distribution for `pitcher_name`.
///
/// With [`HandFilter::All`] the league comparison uses pitchers of either
/// hand; otherwise only pitchers throwing with the same hand(s) as the
/// selected pitcher.
pub fn arsenal(
    valued: &[ValuedPitch],
    pitcher_name: &str,
    hand_filter: HandFilter,
    min_pitches: u32,
) -> ArsenalReport {
    let own: Vec<&ValuedPitch> = valued
        .iter()
        .filter(|v| v.pitch.pitcher_name == pitcher_name)
        .collect();
    let filtered: Vec<&ValuedPitch> = own
        .iter()
        .copied()
        .filter(|v| hand_filter.admits(v.pitch.batter_hand))
        .collect();
    let pitches_thrown = filtered.len() as u32;

    if pitches_thrown < min_pitches || pitches_thrown == 0 {
        return ArsenalReport::NotEnoughPitches {
            pitches_thrown,
            threshold: min_pitches,
        };
    }

    let pitcher_hands: Vec<Handedness> = match hand_filter {
        HandFilter::All => vec![Handedness::Left, Handedness::Right],
        _ => {
            let mut hands: Vec<Handedness> =
                own.iter().filter_map(|v| v.pitch.pitcher_hand).collect();
            hands.sort_unstable();
            hands.dedup();
            hands
        }
    };

    let mut by_type: BTreeMap<PitchType, Vec<f64>> = BTreeMap::new();
    for v in &filtered {
        by_type.entry(v.pitch.pitch_type).or_default().push(v.pitch.plv);
    }

    let mut entries: Vec<ArsenalEntry> = by_type
        .into_iter()
        .filter(|(_, plvs)| plvs.len() as u32 >= MIN_PITCH_TYPE_COUNT)
        .map(|(pitch_type, plvs)| {
            let league: Vec<f64> = valued
                .iter()
                .filter(|v| {
                    v.pitch.pitch_type == pitch_type
                        && hand_filter.admits(v.pitch.batter_hand)
                        && v.pitch
                            .pitcher_hand
                            .is_some_and(|h| pitcher_hands.contains(&h))
                })
                .map(|v| v.pitch.plv)
                .collect();
            ArsenalEntry {
                pitch_type,
                pitch_count: plvs.len() as u32,
                usage_pct: round_one_decimal(plvs.len() as f64 * 100.0 / f64::from(pitches_thrown)),
                mean_plv: mean(&plvs).unwrap_or_default(),
                league_mean_plv: mean(&league),
                histogram: plv_histogram(&plvs),
            }
        })
        .collect();
    entries.sort_by(|a, b| b.pitch_count.cmp(&a.pitch_count));

    ArsenalReport::Arsenal(Arsenal {
        pitcher_name: pitcher_name.to_string(),
        hand_filter,
        pitches_thrown,
        pitcher_hands,
        entries,
    })
}
