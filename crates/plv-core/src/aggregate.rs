// Season aggregation: pitch counts and summed run value per pitcher and
// pitch type.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::model::PitchType;
use crate::run_value::ValuedPitch;

/// Below this many pitches a pitch type's rate statistic is too noisy to report.
pub const MIN_PITCH_TYPE_COUNT: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchTypeSummary {
    pub pitcher_id: i64,
    pub pitcher_name: String,
    pub pitch_type: PitchType,
    pub pitch_count: u32,
    pub summed_run_value: f64,
}

/// Group valued pitches by (pitcher id, pitcher name, pitch type).
///
/// Groups under [`MIN_PITCH_TYPE_COUNT`] pitches are dropped. The result is
/// sorted descending by summed run value.
pub fn aggregate_pitch_types(valued: &[ValuedPitch]) -> Vec<PitchTypeSummary> {
    let mut groups: BTreeMap<(i64, &str, PitchType), (u32, f64)> = BTreeMap::new();
    for v in valued {
        let key = (v.pitch.pitcher_id, v.pitch.pitcher_name.as_str(), v.pitch.pitch_type);
        let entry = groups.entry(key).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += v.run_value;
    }

    let group_count = groups.len();
    let mut summaries: Vec<PitchTypeSummary> = groups
        .into_iter()
        .filter(|(_, (count, _))| *count >= MIN_PITCH_TYPE_COUNT)
        .map(|((pitcher_id, name, pitch_type), (pitch_count, summed_run_value))| {
            PitchTypeSummary {
                pitcher_id,
                pitcher_name: name.to_string(),
                pitch_type,
                pitch_count,
                summed_run_value,
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.summed_run_value
            .partial_cmp(&a.summed_run_value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    debug!(
        "aggregated {} pitches into {} pitcher/pitch-type groups ({} kept)",
        valued.len(),
        group_count,
        summaries.len()
    );
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PitchEvent, SeasonalConstants};

    fn valued(id: i64, pitcher_id: i64, pitch_type: PitchType, plv: f64) -> ValuedPitch {
        let constants = SeasonalConstants {
            season: 2022,
            run_value_coefficient: 0.2,
            run_value_intercept: -0.5,
        };
        ValuedPitch::new(
            PitchEvent {
                pitch_id: id,
                pitcher_id,
                pitcher_name: format!("Pitcher {pitcher_id}"),
                pitch_type,
                plv,
                pitcher_hand: None,
                batter_hand: None,
            },
            &constants,
        )
    }

    fn repeat(n: usize, pitcher_id: i64, pitch_type: PitchType, plv: f64) -> Vec<ValuedPitch> {
        (0..n)
            .map(|i| valued(i as i64, pitcher_id, pitch_type, plv))
            .collect()
    }

    #[test]
    fn counts_and_sums_per_group() {
        let mut pitches = repeat(25, 1, PitchType::FourSeam, 5.0);
        pitches.extend(repeat(30, 1, PitchType::Slider, 6.0));
        let summaries = aggregate_pitch_types(&pitches);
        assert_eq!(summaries.len(), 2);

        // Slider: 30 * 0.7 = 21.0 sorts ahead of four-seam: 25 * 0.5 = 12.5
        assert_eq!(summaries[0].pitch_type, PitchType::Slider);
        assert_eq!(summaries[0].pitch_count, 30);
        assert!((summaries[0].summed_run_value - 21.0).abs() < 1e-9);
        assert_eq!(summaries[1].pitch_count, 25);
        assert!((summaries[1].summed_run_value - 12.5).abs() < 1e-9);
    }

    #[test]
    fn groups_under_twenty_pitches_are_dropped() {
        let mut pitches = repeat(19, 1, PitchType::Curveball, 5.0);
        pitches.extend(repeat(20, 1, PitchType::Changeup, 5.0));
        let summaries = aggregate_pitch_types(&pitches);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].pitch_type, PitchType::Changeup);
    }

    #[test]
    fn pitchers_are_kept_apart() {
        let mut pitches = repeat(20, 1, PitchType::FourSeam, 5.0);
        pitches.extend(repeat(20, 2, PitchType::FourSeam, 5.0));
        let summaries = aggregate_pitch_types(&pitches);
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.pitch_count == 20));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(aggregate_pitch_types(&[]).is_empty());
    }
}
