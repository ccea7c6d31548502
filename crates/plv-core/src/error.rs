// Pipeline error taxonomy.
//
// Only upstream data-contract violations are errors. Pitchers missing a
// workload record and groups below a sample-size cutoff are filtered out by
// the stages themselves and never surface here.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    /// A raw pitch row carries an identifier that cannot be read as an integer.
    #[error("pitch row {pitch_row}: field `{field}` is not an integer: {value:?}")]
    DataIntegrity {
        pitch_row: usize,
        field: &'static str,
        value: String,
    },

    /// A raw pitch row carries a pitch-type code outside the known set.
    #[error("pitch row {pitch_row}: unknown pitch type code {code:?}")]
    UnknownPitchType { pitch_row: usize, code: String },

    /// No run-value coefficients were supplied for the requested season.
    #[error("no seasonal constants for season {season}")]
    Configuration { season: i32 },

    /// A workload record's innings-pitched value is not a number.
    #[error("workload record for player {external_id}: invalid innings pitched {value:?}")]
    InvalidInnings { external_id: i64, value: String },
}
