//! Quality checker trait definition.

use crate::error::Result;
use crate::model::RecordBatch;

/// Row-level quality filter applied before ingestion.
pub trait QualityChecker: Send + Sync {
    /// Validate a batch and return the cleaned copy.
    ///
    /// The input is never mutated. Returns an error when no rows survive.
    fn validate(&self, batch: &RecordBatch) -> Result<RecordBatch>;
}
