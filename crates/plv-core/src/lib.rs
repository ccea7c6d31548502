// Library root: the PLV/PLA statistics pipeline.
//
// Raw pitch records flow one way through the stages:
// normalize -> run_value -> aggregate -> workload -> pla -> threshold.
// Every stage is a pure function over owned or borrowed tables; nothing here
// performs I/O or keeps state between calls.

pub mod aggregate;
pub mod arsenal;
pub mod card;
pub mod error;
pub mod model;
pub mod normalize;
pub mod percentile;
pub mod pipeline;
pub mod pla;
pub mod players;
pub mod quality;
pub mod run_value;
pub mod threshold;
pub mod workload;

pub use error::PipelineError;
pub use model::{Handedness, PitchType};
