// Pitcher card: mean PLV with league percentiles, overall and per pitch
// type, alongside the pitcher's PLA values.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::aggregate::MIN_PITCH_TYPE_COUNT;
use crate::model::PitchType;
use crate::percentile::{mean, percentile_of_score};
use crate::pla::PitcherSeasonSummary;
use crate::run_value::ValuedPitch;

/// Pitch-count floors for the league comparison groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardThresholds {
    pub overall_min_pitches: u32,
    pub pitch_type_min_pitches: u32,
}

impl Default for CardThresholds {
    fn default() -> Self {
        Self {
            overall_min_pitches: 500,
            pitch_type_min_pitches: 125,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardLine {
    /// `None` for the all-pitches line.
    pub pitch_type: Option<PitchType>,
    pub pitch_count: u32,
    pub usage_pct: Option<f64>,
    pub mean_plv: f64,
    /// League percentile (0-100) of `mean_plv`.
    pub plv_percentile: Option<f64>,
    pub pla: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitcherCard {
    pub pitcher_name: String,
    pub season: i32,
    pub overall: CardLine,
    pub pitch_types: Vec<CardLine>,
}

/// Build the card for `pitcher_name`, or `None` if they threw no pitches.
///
/// `pla` is the reportable PLA table; a pitcher missing from it gets no PLA
/// values on the card.
pub fn pitcher_card(
    valued: &[ValuedPitch],
    pla: &[PitcherSeasonSummary],
    pitcher_name: &str,
    thresholds: CardThresholds,
) -> Option<PitcherCard> {
    let mut by_pitcher: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    let mut by_pitcher_type: BTreeMap<(&str, PitchType), Vec<f64>> = BTreeMap::new();
    let mut season = None;
    for v in valued {
        let name = v.pitch.pitcher_name.as_str();
        by_pitcher.entry(name).or_default().push(v.pitch.plv);
        by_pitcher_type
            .entry((name, v.pitch.pitch_type))
            .or_default()
            .push(v.pitch.plv);
        if name == pitcher_name {
            season = Some(v.season);
        }
    }

    let own = by_pitcher.get(pitcher_name)?;
    let total = own.len() as u32;
    let pla_row = pla.iter().find(|p| p.pitcher_name == pitcher_name);

    let league_overall: Vec<f64> = by_pitcher
        .values()
        .filter(|plvs| plvs.len() as u32 >= thresholds.overall_min_pitches)
        .filter_map(|plvs| mean(plvs))
        .collect();
    let overall_mean = mean(own)?;
    let overall = CardLine {
        pitch_type: None,
        pitch_count: total,
        usage_pct: None,
        mean_plv: overall_mean,
        plv_percentile: percentile_of_score(&league_overall, overall_mean),
        pla: pla_row.and_then(|p| p.season_rate_stat),
    };

    let mut pitch_types: Vec<CardLine> = by_pitcher_type
        .iter()
        .filter(|((name, _), plvs)| {
            *name == pitcher_name && plvs.len() as u32 >= MIN_PITCH_TYPE_COUNT
        })
        .filter_map(|((_, pitch_type), plvs)| {
            let mean_plv = mean(plvs)?;
            let league: Vec<f64> = by_pitcher_type
                .iter()
                .filter(|((_, pt), group)| {
                    pt == pitch_type && group.len() as u32 >= thresholds.pitch_type_min_pitches
                })
                .filter_map(|(_, group)| mean(group))
                .collect();
            Some(CardLine {
                pitch_type: Some(*pitch_type),
                pitch_count: plvs.len() as u32,
                usage_pct: Some(plvs.len() as f64 * 100.0 / f64::from(total)),
                mean_plv,
                plv_percentile: percentile_of_score(&league, mean_plv),
                pla: pla_row.and_then(|p| p.pitch_type_rate(*pitch_type)),
            })
        })
        .collect();
    pitch_types.sort_by(|a, b| b.pitch_count.cmp(&a.pitch_count));

    Some(PitcherCard {
        pitcher_name: pitcher_name.to_string(),
        season: season?,
        overall,
        pitch_types,
    })
}
