//! Contract definitions for record batches.
//!
//! This module contains trait definitions that providers must implement.

mod batch_source;
mod quality_checker;

pub use batch_source::BatchSource;
pub use quality_checker::QualityChecker;
