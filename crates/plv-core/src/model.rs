// Domain types shared by every pipeline stage.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Pitch types
// ---------------------------------------------------------------------------

/// Pitch classification codes carried by the raw pitch data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PitchType {
    #[serde(rename = "FF")]
    FourSeam,
    #[serde(rename = "SI")]
    Sinker,
    #[serde(rename = "SL")]
    Slider,
    #[serde(rename = "CH")]
    Changeup,
    #[serde(rename = "CU")]
    Curveball,
    #[serde(rename = "FC")]
    Cutter,
    #[serde(rename = "FS")]
    Splitter,
    #[serde(rename = "KN")]
    Knuckleball,
    #[serde(rename = "SC")]
    Screwball,
    #[serde(rename = "UN")]
    Unknown,
}

impl PitchType {
    /// Column order of the per-pitch-type PLA table.
    pub const REPORT_ORDER: [PitchType; 7] = [
        PitchType::FourSeam,
        PitchType::Sinker,
        PitchType::Slider,
        PitchType::Changeup,
        PitchType::Curveball,
        PitchType::Cutter,
        PitchType::Splitter,
    ];

    /// Parse a two-letter pitch code (case-insensitive, surrounding whitespace ignored).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "FF" => Some(PitchType::FourSeam),
            "SI" => Some(PitchType::Sinker),
            "SL" => Some(PitchType::Slider),
            "CH" => Some(PitchType::Changeup),
            "CU" => Some(PitchType::Curveball),
            "FC" => Some(PitchType::Cutter),
            "FS" => Some(PitchType::Splitter),
            "KN" => Some(PitchType::Knuckleball),
            "SC" => Some(PitchType::Screwball),
            "UN" => Some(PitchType::Unknown),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            PitchType::FourSeam => "FF",
            PitchType::Sinker => "SI",
            PitchType::Slider => "SL",
            PitchType::Changeup => "CH",
            PitchType::Curveball => "CU",
            PitchType::Cutter => "FC",
            PitchType::Splitter => "FS",
            PitchType::Knuckleball => "KN",
            PitchType::Screwball => "SC",
            PitchType::Unknown => "UN",
        }
    }

    /// Human-readable name used in legends and card rows.
    pub fn display_name(&self) -> &'static str {
        match self {
            PitchType::FourSeam => "Four-Seamer",
            PitchType::Sinker => "Sinker",
            PitchType::Slider => "Slider",
            PitchType::Changeup => "Changeup",
            PitchType::Curveball => "Curveball",
            PitchType::Cutter => "Cutter",
            PitchType::Splitter => "Splitter",
            PitchType::Knuckleball => "Knuckleball",
            PitchType::Screwball => "Screwball",
            PitchType::Unknown => "Unknown",
        }
    }

    /// Rare pitch types that are dropped before any aggregation.
    pub fn is_excluded(&self) -> bool {
        matches!(self, PitchType::Knuckleball | PitchType::Screwball)
    }
}

impl fmt::Display for PitchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Handedness
// ---------------------------------------------------------------------------

/// Throwing hand of a pitcher or batting side of a hitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Handedness {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
}

impl Handedness {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "L" => Some(Handedness::Left),
            "R" => Some(Handedness::Right),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Handedness::Left => "L",
            Handedness::Right => "R",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        }
    }
}

/// Which batters a distribution is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandFilter {
    Left,
    #[default]
    All,
    Right,
}

impl HandFilter {
    /// Batting sides admitted by this filter.
    pub fn batter_hands(&self) -> &'static [Handedness] {
        match self {
            HandFilter::Left => &[Handedness::Left],
            HandFilter::All => &[Handedness::Left, Handedness::Right],
            HandFilter::Right => &[Handedness::Right],
        }
    }

    pub fn admits(&self, hand: Option<Handedness>) -> bool {
        hand.is_some_and(|h| self.batter_hands().contains(&h))
    }
}

// ---------------------------------------------------------------------------
// Pitch events
// ---------------------------------------------------------------------------

/// One pitch as delivered by the data loader, before normalization.
///
/// Identifiers stay textual here so that the normalizer can reject rows that
/// do not hold integers instead of the loader silently dropping them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPitchEvent {
    pub pitch_id: String,
    pub pitcher_id: String,
    pub pitcher_name: String,
    pub pitch_type: String,
    pub plv: f64,
    #[serde(default)]
    pub pitcher_hand: Option<String>,
    #[serde(default)]
    pub batter_hand: Option<String>,
}

/// A normalized pitch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchEvent {
    pub pitch_id: i64,
    pub pitcher_id: i64,
    pub pitcher_name: String,
    pub pitch_type: PitchType,
    pub plv: f64,
    pub pitcher_hand: Option<Handedness>,
    pub batter_hand: Option<Handedness>,
}

// ---------------------------------------------------------------------------
// Seasonal constants
// ---------------------------------------------------------------------------

/// Linear map from PLV to expected runs for one season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalConstants {
    pub season: i32,
    pub run_value_coefficient: f64,
    pub run_value_intercept: f64,
}

/// All known seasonal constants, keyed by season.
#[derive(Debug, Clone, Default)]
pub struct SeasonalConstantsTable {
    by_season: HashMap<i32, SeasonalConstants>,
}

impl SeasonalConstantsTable {
    pub fn from_rows(rows: impl IntoIterator<Item = SeasonalConstants>) -> Self {
        let mut by_season = HashMap::new();
        for row in rows {
            if by_season.insert(row.season, row).is_some() {
                warn!("duplicate seasonal constants for {}, using latest row", row.season);
            }
        }
        Self { by_season }
    }

    /// Constants for `season`, or a configuration error when none exist.
    pub fn for_season(&self, season: i32) -> Result<&SeasonalConstants, PipelineError> {
        self.by_season
            .get(&season)
            .ok_or(PipelineError::Configuration { season })
    }

    pub fn seasons(&self) -> Vec<i32> {
        let mut seasons: Vec<i32> = self.by_season.keys().copied().collect();
        seasons.sort_unstable();
        seasons
    }

    pub fn len(&self) -> usize {
        self.by_season.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_season.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Workload and identity crosswalk
// ---------------------------------------------------------------------------

/// Season workload of one pitcher from the external stats provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadRecord {
    pub external_player_id: i64,
    pub season: i32,
    /// Baseball notation: the digit after the point counts thirds of an inning.
    pub innings_pitched: String,
    pub season_pitch_count: u32,
}

/// Maps pitch-data pitcher ids onto the workload provider's ids.
#[derive(Debug, Clone, Default)]
pub struct IdentityCrosswalk {
    primary_to_external: HashMap<i64, i64>,
}

impl IdentityCrosswalk {
    /// Build the crosswalk, dropping rows where either id is missing.
    ///
    /// When a primary id appears more than once the first mapping wins.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Option<i64>, Option<i64>)>) -> Self {
        let mut primary_to_external = HashMap::new();
        for pair in pairs {
            let (Some(primary), Some(external)) = pair else {
                continue;
            };
            match primary_to_external.get(&primary) {
                Some(&existing) if existing != external => {
                    warn!(
                        "crosswalk maps {} to both {} and {}, keeping {}",
                        primary, existing, external, existing
                    );
                }
                Some(_) => {}
                None => {
                    primary_to_external.insert(primary, external);
                }
            }
        }
        Self { primary_to_external }
    }

    pub fn external_id(&self, primary_id: i64) -> Option<i64> {
        self.primary_to_external.get(&primary_id).copied()
    }

    pub fn len(&self) -> usize {
        self.primary_to_external.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary_to_external.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_codes_roundtrip_through_from_code() {
        for pt in [
            PitchType::FourSeam,
            PitchType::Sinker,
            PitchType::Slider,
            PitchType::Changeup,
            PitchType::Curveball,
            PitchType::Cutter,
            PitchType::Splitter,
            PitchType::Knuckleball,
            PitchType::Screwball,
            PitchType::Unknown,
        ] {
            assert_eq!(PitchType::from_code(pt.code()), Some(pt));
        }
        assert_eq!(PitchType::from_code(" ff "), Some(PitchType::FourSeam));
        assert_eq!(PitchType::from_code("XX"), None);
    }

    #[test]
    fn only_knuckleball_and_screwball_are_excluded() {
        let excluded: Vec<PitchType> = [
            PitchType::FourSeam,
            PitchType::Knuckleball,
            PitchType::Screwball,
            PitchType::Unknown,
        ]
        .into_iter()
        .filter(|p| p.is_excluded())
        .collect();
        assert_eq!(excluded, vec![PitchType::Knuckleball, PitchType::Screwball]);
    }

    #[test]
    fn hand_filter_admits_expected_sides() {
        assert!(HandFilter::All.admits(Some(Handedness::Left)));
        assert!(HandFilter::All.admits(Some(Handedness::Right)));
        assert!(!HandFilter::All.admits(None));
        assert!(HandFilter::Left.admits(Some(Handedness::Left)));
        assert!(!HandFilter::Left.admits(Some(Handedness::Right)));
    }

    #[test]
    fn missing_season_is_a_configuration_error() {
        let table = SeasonalConstantsTable::from_rows([SeasonalConstants {
            season: 2022,
            run_value_coefficient: 0.2,
            run_value_intercept: -0.5,
        }]);
        assert!(table.for_season(2022).is_ok());
        assert_eq!(
            table.for_season(2019).unwrap_err(),
            PipelineError::Configuration { season: 2019 }
        );
    }

    #[test]
    fn crosswalk_drops_incomplete_rows() {
        let cw = IdentityCrosswalk::from_pairs([
            (Some(1), Some(100)),
            (Some(2), None),
            (None, Some(300)),
            (Some(1), Some(999)),
        ]);
        assert_eq!(cw.len(), 1);
        assert_eq!(cw.external_id(1), Some(100));
        assert_eq!(cw.external_id(2), None);
    }

    #[test]
    fn pitch_type_displays_as_code() {
        assert_eq!(PitchType::Cutter.to_string(), "FC");
        assert_eq!(PitchType::Cutter.display_name(), "Cutter");
    }
}
