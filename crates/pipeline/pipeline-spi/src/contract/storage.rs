//! Storage trait definition.

use aggregate_spi::AggregateCollection;
use anomaly_spi::AnomalyReport;
use batch_spi::RecordBatch;

use crate::error::Result;

/// Event, aggregate and report persistence.
///
/// Methods take `&self` so one store can be shared between the loader and
/// the orchestrator.
pub trait Storage: Send + Sync {
    /// Create tables if they do not exist.
    fn ensure_schema(&self) -> Result<()>;

    /// Append a batch of events, returning the rows written.
    fn ingest_batch(&self, batch: &RecordBatch) -> Result<usize>;

    /// Events of the most recent window, sorted by `event_time`.
    ///
    /// Fails with [`PipelineError::EmptyWindow`] when no event falls in the
    /// window.
    ///
    /// [`PipelineError::EmptyWindow`]: crate::PipelineError::EmptyWindow
    fn read_latest_window(&self) -> Result<RecordBatch>;

    fn persist_aggregates(&self, aggregates: &AggregateCollection) -> Result<()>;

    fn persist_report(&self, report: &AnomalyReport) -> Result<()>;
}
