//! Batch source trait definition.

use crate::error::Result;
use crate::model::RecordBatch;

/// A producer of event batches to be ingested.
///
/// Implementations may generate, replay or fetch rows; the pipeline only
/// sees the resulting sequence of immutable batches.
pub trait BatchSource: Send + Sync {
    /// Source name, used in logs.
    fn name(&self) -> &str;

    /// Produce every batch this source has to offer.
    fn batches(&mut self) -> Result<Vec<RecordBatch>>;
}
