// Pitch-record normalization: id coercion, rare pitch-type exclusion,
// ordering and de-duplication by pitch id.

use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::model::{Handedness, PitchEvent, PitchType, RawPitchEvent};

/// Read an identifier as an integer.
///
/// Accepts plain integers and integral floats ("12345.0"), which is how ids
/// come back from columnar exports that passed through a float column.
pub fn coerce_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(id) = trimmed.parse::<i64>() {
        return Some(id);
    }
    let value: f64 = trimmed.parse().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn coerce_field(pitch_row: usize, field: &'static str, raw: &str) -> Result<i64, PipelineError> {
    coerce_id(raw).ok_or_else(|| PipelineError::DataIntegrity {
        pitch_row,
        field,
        value: raw.to_string(),
    })
}

/// Normalize a season's raw pitch table.
///
/// Every row's ids are checked before anything is dropped, so a malformed id
/// on an excluded pitch type still fails the load. The output is sorted
/// ascending by `pitch_id` with duplicate ids removed (first occurrence kept).
pub fn normalize(raw: &[RawPitchEvent]) -> Result<Vec<PitchEvent>, PipelineError> {
    let mut events = Vec::with_capacity(raw.len());
    let mut excluded = 0usize;

    for (row, pitch) in raw.iter().enumerate() {
        let pitch_id = coerce_field(row, "pitch_id", &pitch.pitch_id)?;
        let pitcher_id = coerce_field(row, "pitcher_id", &pitch.pitcher_id)?;
        let pitch_type =
            PitchType::from_code(&pitch.pitch_type).ok_or_else(|| PipelineError::UnknownPitchType {
                pitch_row: row,
                code: pitch.pitch_type.clone(),
            })?;

        if pitch_type.is_excluded() {
            excluded += 1;
            continue;
        }

        events.push(PitchEvent {
            pitch_id,
            pitcher_id,
            pitcher_name: pitch.pitcher_name.trim().to_string(),
            pitch_type,
            plv: pitch.plv,
            pitcher_hand: pitch.pitcher_hand.as_deref().and_then(Handedness::from_code),
            batter_hand: pitch.batter_hand.as_deref().and_then(Handedness::from_code),
        });
    }

    // Stable sort keeps the first of any duplicated id in front.
    events.sort_by_key(|e| e.pitch_id);
    let before_dedup = events.len();
    events.dedup_by_key(|e| e.pitch_id);
    let duplicates = before_dedup - events.len();
    if duplicates > 0 {
        warn!("dropped {} pitches with duplicate pitch_id", duplicates);
    }

    debug!(
        "normalized {} raw pitches into {} ({} excluded pitch types)",
        raw.len(),
        events.len(),
        excluded
    );
    Ok(events)
}
