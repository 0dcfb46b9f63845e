//! IQR detector.

use aggregate_core::stats;
use anomaly_api::{IqrConfig, IQR};
use anomaly_spi::{AnomalyDetector, Result};
use batch_spi::RecordBatch;

use super::flagged_fraction;

/// IQR-based anomaly detector.
///
/// Flags rows whose `value` falls outside `[Q1 - k*IQR, Q3 + k*IQR]`.
/// Scores are 1.0 for flagged rows and 0.0 otherwise; a window with zero
/// spread flags nothing.
#[derive(Debug, Clone)]
pub struct IqrDetector {
    multiplier: f64,
    q1: f64,
    q3: f64,
}

impl IqrDetector {
    /// Create a new IQR detector with given multiplier.
    pub fn new(multiplier: f64) -> Self {
        Self {
            multiplier,
            q1: 0.0,
            q3: 0.0,
        }
    }

    /// Create from configuration.
    pub fn from_config(config: IqrConfig) -> Self {
        Self::new(config.multiplier)
    }

    /// Outlier bounds from the last fit.
    pub fn bounds(&self) -> (f64, f64) {
        let iqr = self.q3 - self.q1;
        (
            self.q1 - self.multiplier * iqr,
            self.q3 + self.multiplier * iqr,
        )
    }
}

impl Default for IqrDetector {
    fn default() -> Self {
        Self::from_config(IqrConfig::default())
    }
}

impl AnomalyDetector for IqrDetector {
    fn name(&self) -> &str {
        IQR
    }

    fn fit_predict(&mut self, batch: &RecordBatch) -> Result<Vec<f64>> {
        let values = batch.values();
        if values.is_empty() {
            return Ok(Vec::new());
        }
        self.q1 = stats::quantile(&values, 0.25);
        self.q3 = stats::quantile(&values, 0.75);

        let iqr = self.q3 - self.q1;
        if iqr == 0.0 || !iqr.is_finite() {
            return Ok(vec![0.0; values.len()]);
        }
        let (lower, upper) = self.bounds();
        Ok(values
            .iter()
            .map(|&v| if v < lower || v > upper { 1.0 } else { 0.0 })
            .collect())
    }

    fn severity(&self, scores: &[f64]) -> Result<f64> {
        Ok(flagged_fraction(scores, |s| s > 0.0))
    }
}
