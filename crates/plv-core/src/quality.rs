// Pitch-quality rates: the share of a pitcher's pitches in each quality tier.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::run_value::ValuedPitch;

/// QP% / AP% / BP% for one pitcher, all on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitcherQualityRates {
    pub pitcher_name: String,
    pub pitch_count: u32,
    pub quality_pct: f64,
    pub average_pct: f64,
    pub bad_pct: f64,
    /// QP% minus BP%; equivalently the mean quality margin times 100.
    pub qp_minus_bp_pct: f64,
}

/// Tier rates per pitcher with at least `min_pitches` pitches, best
/// QP-BP% first.
pub fn quality_rates(valued: &[ValuedPitch], min_pitches: u32) -> Vec<PitcherQualityRates> {
    #[derive(Default)]
    struct Counts {
        total: u32,
        quality: u32,
        average: u32,
        bad: u32,
    }

    let mut by_name: BTreeMap<&str, Counts> = BTreeMap::new();
    for v in valued {
        let c = by_name.entry(v.pitch.pitcher_name.as_str()).or_default();
        c.total += 1;
        c.quality += u32::from(v.is_quality);
        c.average += u32::from(v.is_average);
        c.bad += u32::from(v.is_bad);
    }

    let mut rates: Vec<PitcherQualityRates> = by_name
        .into_iter()
        .filter(|(_, c)| c.total >= min_pitches && c.total > 0)
        .map(|(name, c)| {
            let pct = |n: u32| f64::from(n) * 100.0 / f64::from(c.total);
            PitcherQualityRates {
                pitcher_name: name.to_string(),
                pitch_count: c.total,
                quality_pct: pct(c.quality),
                average_pct: pct(c.average),
                bad_pct: pct(c.bad),
                qp_minus_bp_pct: pct(c.quality) - pct(c.bad),
            }
        })
        .collect();

    rates.sort_by(|a, b| {
        b.qp_minus_bp_pct
            .partial_cmp(&a.qp_minus_bp_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PitchEvent, PitchType, SeasonalConstants};

    fn pitches(name: &str, plvs: &[f64]) -> Vec<ValuedPitch> {
        let constants = SeasonalConstants {
            season: 2022,
            run_value_coefficient: 0.2,
            run_value_intercept: -0.5,
        };
        plvs.iter()
            .enumerate()
            .map(|(i, plv)| {
                ValuedPitch::new(
                    PitchEvent {
                        pitch_id: i as i64,
                        pitcher_id: 1,
                        pitcher_name: name.into(),
                        pitch_type: PitchType::FourSeam,
                        plv: *plv,
                        pitcher_hand: None,
                        batter_hand: None,
                    },
                    &constants,
                )
            })
            .collect()
    }

    #[test]
    fn tier_shares_sum_to_one_hundred() {
        let valued = pitches("A", &[4.0, 5.0, 6.0, 6.0]);
        let rates = quality_rates(&valued, 1);
        let r = &rates[0];
        assert_eq!(r.pitch_count, 4);
        assert!((r.quality_pct - 50.0).abs() < 1e-9);
        assert!((r.average_pct - 25.0).abs() < 1e-9);
        assert!((r.bad_pct - 25.0).abs() < 1e-9);
        assert!((r.qp_minus_bp_pct - 25.0).abs() < 1e-9);
        assert!((r.quality_pct + r.average_pct + r.bad_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn margin_equals_mean_quality_margin() {
        let valued = pitches("A", &[4.0, 4.0, 5.0, 6.0, 6.0, 6.0]);
        let mean_margin: f64 = valued.iter().map(|v| f64::from(v.quality_margin)).sum::<f64>()
            / valued.len() as f64;
        let rates = quality_rates(&valued, 1);
        assert!((rates[0].qp_minus_bp_pct - mean_margin * 100.0).abs() < 1e-9);
    }

    #[test]
    fn filtered_and_sorted() {
        let mut valued = pitches("Low", &[4.0, 4.0, 4.0]);
        valued.extend(pitches("High", &[6.0, 6.0, 6.0]));
        valued.extend(pitches("Few", &[6.0]));
        let names: Vec<String> = quality_rates(&valued, 3)
            .into_iter()
            .map(|r| r.pitcher_name)
            .collect();
        assert_eq!(names, vec!["High", "Low"]);
    }
}
