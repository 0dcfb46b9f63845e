//! Record Batch Service Provider Interface
//!
//! Defines the tabular event model and the contracts implemented by
//! batch sources and quality checkers.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{BatchSource, QualityChecker};
pub use error::{BatchError, Result};
pub use model::{Column, EventRecord, RecordBatch, HIGH_CALLDATA_THRESHOLD};
