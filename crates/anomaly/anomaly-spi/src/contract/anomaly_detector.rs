//! Anomaly detector trait definition.

use batch_spi::RecordBatch;

use crate::error::Result;

/// Anomaly detector capability contract.
///
/// A detector scores every row of one window and reduces those scores to a
/// single severity. How either number is computed is up to the detector;
/// the ensemble only relies on the two operations below.
pub trait AnomalyDetector: Send + Sync {
    /// Stable identity, unique within one ensemble.
    fn name(&self) -> &str;

    /// Fit on the window and score each row, in row order.
    ///
    /// Must return exactly one score per row and an empty vector for an
    /// empty batch.
    fn fit_predict(&mut self, batch: &RecordBatch) -> Result<Vec<f64>>;

    /// Reduce per-row scores to one window-level severity.
    fn severity(&self, scores: &[f64]) -> Result<f64>;
}
