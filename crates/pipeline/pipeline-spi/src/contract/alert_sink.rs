//! Alert sink trait definition.

use anomaly_spi::AnomalyReport;

use crate::error::Result;

/// Alert delivery transport.
pub trait AlertSink: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver one report. Failures surface as
    /// [`PipelineError::AlertDelivery`](crate::PipelineError::AlertDelivery).
    fn send(&self, report: &AnomalyReport) -> Result<()>;
}
