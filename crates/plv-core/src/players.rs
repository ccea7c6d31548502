// Pitcher selector list: who has thrown enough pitches to be chosen.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::run_value::ValuedPitch;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitcherOverview {
    pub pitcher_name: String,
    pub pitch_count: u32,
    pub mean_plv: f64,
}

/// Pitchers with at least `min_pitches` pitches, highest mean PLV first.
pub fn selectable_pitchers(valued: &[ValuedPitch], min_pitches: u32) -> Vec<PitcherOverview> {
    let mut by_name: BTreeMap<&str, (u32, f64)> = BTreeMap::new();
    for v in valued {
        let entry = by_name.entry(v.pitch.pitcher_name.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += v.pitch.plv;
    }

    let mut pitchers: Vec<PitcherOverview> = by_name
        .into_iter()
        .filter(|(_, (count, _))| *count >= min_pitches && *count > 0)
        .map(|(name, (count, plv_sum))| PitcherOverview {
            pitcher_name: name.to_string(),
            pitch_count: count,
            mean_plv: plv_sum / f64::from(count),
        })
        .collect();
    pitchers.sort_by(|a, b| {
        b.mean_plv
            .partial_cmp(&a.mean_plv)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pitchers
}
