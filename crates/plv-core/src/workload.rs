// Workload join: attach season innings pitched and pitch counts from the
// external stats provider, then allocate innings to each pitch type by usage.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use crate::aggregate::PitchTypeSummary;
use crate::error::PipelineError;
use crate::model::{IdentityCrosswalk, WorkloadRecord};

/// A pitch-type summary with its pitcher's season workload attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedPitchType {
    #[serde(flatten)]
    pub summary: PitchTypeSummary,
    pub external_player_id: i64,
    pub season_innings_pitched: f64,
    pub season_pitch_count: u32,
    /// Season innings scaled by this pitch type's share of season pitches.
    /// `None` when the share cannot be computed or comes out as zero.
    pub pitchtype_innings_proxy: Option<f64>,
}

/// A pitcher whose workload could not be resolved. Not an error: these
/// pitchers stay valid for PLV-only reports but carry no PLA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinGap {
    pub pitcher_id: i64,
    pub pitcher_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct WorkloadJoin {
    pub rows: Vec<JoinedPitchType>,
    pub gaps: Vec<JoinGap>,
}

/// Convert baseball innings notation into a real number of innings.
///
/// The whole part is the integer floor of the value. The thirds digit is the
/// last character of the value's shortest decimal rendering, with whole
/// numbers rendering as "N.0". So "62.1" is 62 1/3 and "70" is 70.
///
/// Only the final character is read, so a malformed value such as "62.5"
/// yields 62 + 5/3. That is logged, not corrected.
pub fn parse_innings_pitched(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let whole = value.trunc();
    let rendered = value.to_string();
    let thirds = if rendered.contains('.') {
        rendered.chars().last()?.to_digit(10)?
    } else {
        0
    };
    if thirds > 2 {
        warn!(
            "innings pitched {:?} ends in {}, outside the thirds convention",
            raw, thirds
        );
    }
    Some(whole + f64::from(thirds) / 3.0)
}

/// `pitch_count / season_pitch_count * season_innings_pitched`, or `None`
/// when the pitcher has no recorded season pitches or the proxy is zero.
pub fn innings_proxy(pitch_count: u32, season_pitch_count: u32, season_innings: f64) -> Option<f64> {
    if season_pitch_count == 0 {
        return None;
    }
    let proxy = f64::from(pitch_count) / f64::from(season_pitch_count) * season_innings;
    (proxy.is_finite() && proxy != 0.0).then_some(proxy)
}

/// Join pitch-type summaries to the season's workload records.
///
/// Records for other seasons are ignored. When a provider id appears twice
/// for the season the later record wins. Pitchers with no crosswalk entry, no
/// workload record, or a record with blank innings are reported in `gaps` and
/// left out of `rows`. Non-blank innings that do not parse are an error.
pub fn join_workload(
    summaries: &[PitchTypeSummary],
    workloads: &[WorkloadRecord],
    crosswalk: &IdentityCrosswalk,
    season: i32,
) -> Result<WorkloadJoin, PipelineError> {
    let mut by_external: HashMap<i64, &WorkloadRecord> = HashMap::new();
    for record in workloads.iter().filter(|w| w.season == season) {
        by_external.insert(record.external_player_id, record);
    }

    let mut parsed_innings: HashMap<i64, f64> = HashMap::new();
    let mut gaps: BTreeMap<i64, String> = BTreeMap::new();
    let mut rows = Vec::with_capacity(summaries.len());

    for summary in summaries {
        let record = crosswalk
            .external_id(summary.pitcher_id)
            .and_then(|ext| by_external.get(&ext).copied())
            .filter(|r| !r.innings_pitched.trim().is_empty());
        let Some(record) = record else {
            gaps.entry(summary.pitcher_id)
                .or_insert_with(|| summary.pitcher_name.clone());
            continue;
        };

        let season_innings = match parsed_innings.get(&record.external_player_id) {
            Some(&ip) => ip,
            None => {
                let ip = parse_innings_pitched(&record.innings_pitched).ok_or_else(|| {
                    PipelineError::InvalidInnings {
                        external_id: record.external_player_id,
                        value: record.innings_pitched.clone(),
                    }
                })?;
                parsed_innings.insert(record.external_player_id, ip);
                ip
            }
        };

        rows.push(JoinedPitchType {
            summary: summary.clone(),
            external_player_id: record.external_player_id,
            season_innings_pitched: season_innings,
            season_pitch_count: record.season_pitch_count,
            pitchtype_innings_proxy: innings_proxy(
                summary.pitch_count,
                record.season_pitch_count,
                season_innings,
            ),
        });
    }

    let gaps: Vec<JoinGap> = gaps
        .into_iter()
        .map(|(pitcher_id, pitcher_name)| JoinGap {
            pitcher_id,
            pitcher_name,
        })
        .collect();
    for gap in &gaps {
        warn!(
            "no {} workload for pitcher {} ({}), excluded from PLA",
            season, gap.pitcher_name, gap.pitcher_id
        );
    }
    debug!(
        "joined {} of {} pitch-type rows to workload ({} pitchers unresolved)",
        rows.len(),
        summaries.len(),
        gaps.len()
    );

    Ok(WorkloadJoin { rows, gaps })
}
