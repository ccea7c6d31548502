// Run-value model: PLV -> expected runs via the season's linear constants,
// plus the Bad / Average / Quality tiering of each pitch.

use serde::Serialize;
use tracing::debug;

use crate::error::PipelineError;
use crate::model::{PitchEvent, SeasonalConstants, SeasonalConstantsTable};

/// PLV strictly below this is a bad pitch.
pub const BAD_PLV_CEILING: f64 = 4.5;

/// PLV at or above this is a quality pitch.
pub const QUALITY_PLV_FLOOR: f64 = 5.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QualityTier {
    Bad,
    Average,
    Quality,
}

impl QualityTier {
    pub fn from_plv(plv: f64) -> Self {
        if plv >= QUALITY_PLV_FLOOR {
            QualityTier::Quality
        } else if plv < BAD_PLV_CEILING {
            QualityTier::Bad
        } else {
            QualityTier::Average
        }
    }

    /// Short label used in table headers (QP / AP / BP).
    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Bad => "BP",
            QualityTier::Average => "AP",
            QualityTier::Quality => "QP",
        }
    }
}

/// A normalized pitch with its run value and quality tier attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuedPitch {
    #[serde(flatten)]
    pub pitch: PitchEvent,
    pub season: i32,
    pub run_value: f64,
    pub quality_tier: QualityTier,
    pub is_quality: bool,
    pub is_average: bool,
    pub is_bad: bool,
    /// `is_quality - is_bad`, one of -1, 0, 1.
    pub quality_margin: i8,
}

impl ValuedPitch {
    pub fn new(pitch: PitchEvent, constants: &SeasonalConstants) -> Self {
        let run_value = run_value(pitch.plv, constants);
        let quality_tier = QualityTier::from_plv(pitch.plv);
        let is_quality = quality_tier == QualityTier::Quality;
        let is_bad = quality_tier == QualityTier::Bad;
        Self {
            pitch,
            season: constants.season,
            run_value,
            quality_tier,
            is_quality,
            is_average: quality_tier == QualityTier::Average,
            is_bad,
            quality_margin: is_quality as i8 - is_bad as i8,
        }
    }
}

/// `plv * coefficient + intercept`
pub fn run_value(plv: f64, constants: &SeasonalConstants) -> f64 {
    plv * constants.run_value_coefficient + constants.run_value_intercept
}

/// Value every pitch of `season`, failing when the season has no constants.
pub fn value_pitches(
    events: Vec<PitchEvent>,
    season: i32,
    table: &SeasonalConstantsTable,
) -> Result<Vec<ValuedPitch>, PipelineError> {
    let constants = table.for_season(season)?;
    debug!(
        "valuing {} pitches for {} (coef {}, intercept {})",
        events.len(),
        season,
        constants.run_value_coefficient,
        constants.run_value_intercept
    );
    Ok(events
        .into_iter()
        .map(|e| ValuedPitch::new(e, constants))
        .collect())
}
