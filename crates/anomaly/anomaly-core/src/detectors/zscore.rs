//! Z-Score detector.

use aggregate_core::stats;
use anomaly_api::{ZScoreConfig, ZSCORE};
use anomaly_spi::{AnomalyDetector, Result};
use batch_spi::RecordBatch;

use super::flagged_fraction;

/// Z-Score based anomaly detector.
///
/// Scores each row by its absolute distance from the window mean of
/// `value`, in sample standard deviations. Rows above the threshold are
/// flagged.
#[derive(Debug, Clone)]
pub struct ZScoreDetector {
    threshold: f64,
    mean: f64,
    std_dev: f64,
}

impl ZScoreDetector {
    /// Create a new Z-Score detector with given threshold.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            mean: 0.0,
            std_dev: 0.0,
        }
    }

    /// Create from configuration.
    pub fn from_config(config: ZScoreConfig) -> Self {
        Self::new(config.threshold)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Mean and standard deviation from the last fit.
    pub fn fitted(&self) -> (f64, f64) {
        (self.mean, self.std_dev)
    }
}

impl Default for ZScoreDetector {
    fn default() -> Self {
        Self::from_config(ZScoreConfig::default())
    }
}

impl AnomalyDetector for ZScoreDetector {
    fn name(&self) -> &str {
        ZSCORE
    }

    fn fit_predict(&mut self, batch: &RecordBatch) -> Result<Vec<f64>> {
        let values = batch.values();
        if values.is_empty() {
            return Ok(Vec::new());
        }
        self.mean = stats::mean(&values);
        self.std_dev = stats::sample_std(&values);

        // constant or single-row window: nothing deviates
        if !(self.std_dev.is_finite() && self.std_dev > 0.0) {
            return Ok(vec![0.0; values.len()]);
        }
        Ok(values
            .iter()
            .map(|v| ((v - self.mean) / self.std_dev).abs())
            .collect())
    }

    fn severity(&self, scores: &[f64]) -> Result<f64> {
        Ok(flagged_fraction(scores, |s| s > self.threshold))
    }
}
