// Reporting cutoff for the PLA table.

use crate::pla::PitcherSeasonSummary;

/// Keep pitchers with at least `min_pitches` season pitches, ordered by PLA
/// ascending (fewer expected runs first). Pitchers without a PLA sort last.
pub fn filter_reportable(
    summaries: Vec<PitcherSeasonSummary>,
    min_pitches: u32,
) -> Vec<PitcherSeasonSummary> {
    let mut kept: Vec<PitcherSeasonSummary> = summaries
        .into_iter()
        .filter(|s| s.season_pitch_count >= min_pitches)
        .collect();
    kept.sort_by(|a, b| match (a.season_rate_stat, b.season_rate_stat) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn summary(id: i64, pitches: u32, pla: Option<f64>) -> PitcherSeasonSummary {
        PitcherSeasonSummary {
            pitcher_id: id,
            pitcher_name: format!("Pitcher {id}"),
            season_pitch_count: pitches,
            season_innings_pitched: 50.0,
            season_rate_stat: pla,
            pitch_type_rates: BTreeMap::new(),
        }
    }

    #[test]
    fn cutoff_is_inclusive() {
        let kept = filter_reportable(
            vec![summary(1, 499, Some(3.0)), summary(2, 500, Some(4.0))],
            500,
        );
        let ids: Vec<i64> = kept.iter().map(|s| s.pitcher_id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn sorted_ascending_with_missing_last() {
        let kept = filter_reportable(
            vec![
                summary(1, 900, Some(4.5)),
                summary(2, 900, None),
                summary(3, 900, Some(2.1)),
            ],
            200,
        );
        let ids: Vec<i64> = kept.iter().map(|s| s.pitcher_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
