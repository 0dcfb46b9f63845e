//! Pipeline Service Provider Interface
//!
//! Defines the collaborators the orchestrator drives (loader, storage,
//! alert sink), the run state machine and pipeline errors.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{AlertSink, Loader, Storage};
pub use error::{PipelineError, Result};
pub use model::{PipelineOutcome, PipelineState};
