//! Data models for pipeline runs.

mod outcome;
mod state;

pub use outcome::PipelineOutcome;
pub use state::PipelineState;
