//! Record Batch Core
//!
//! Implementations for batch sources and row-level quality checks.

mod ndjson;
mod quality;
mod synthetic;

pub use ndjson::NdjsonSource;
pub use quality::ColumnQualityChecker;
pub use synthetic::SyntheticGenerator;
