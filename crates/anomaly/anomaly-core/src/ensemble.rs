//! Detector ensemble.

use std::collections::HashSet;

use aggregate_core::stats;
use anomaly_api::AnomalyDetectionConfig;
use anomaly_spi::{AnomalyDetector, AnomalyError, AnomalyReport, DetectorAnomaly, Result};
use batch_spi::RecordBatch;
use chrono::Utc;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::registry::DetectorRegistry;

/// Ensemble score of a detector that produced no scores.
pub const SCORE_FLOOR: f64 = 0.0;

/// Runs every configured detector over one window and assembles a report.
///
/// Results keep configuration order whether detectors run sequentially or
/// on the rayon pool. Any detector failure fails the whole run; the error
/// names the detector.
pub struct DetectorEnsemble {
    detectors: Vec<Box<dyn AnomalyDetector>>,
    parallel: bool,
}

impl DetectorEnsemble {
    /// Create an ensemble; detector names must be unique.
    pub fn new(detectors: Vec<Box<dyn AnomalyDetector>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for detector in &detectors {
            if !seen.insert(detector.name().to_string()) {
                return Err(AnomalyError::DuplicateDetector(detector.name().to_string()));
            }
        }
        Ok(Self {
            detectors,
            parallel: false,
        })
    }

    /// Build the configured detectors through `registry`.
    pub fn from_config(registry: &DetectorRegistry, config: &AnomalyDetectionConfig) -> Result<Self> {
        Ok(Self::new(registry.build_all(config)?)?.parallel(config.parallel))
    }

    /// Evaluate detectors on the rayon pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Detector names in configuration order.
    pub fn names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Score `batch` with every detector.
    ///
    /// The report's window bounds are the batch's earliest and latest
    /// `event_time`; an empty batch is [`AnomalyError::EmptyWindow`].
    pub fn run(&mut self, batch: &RecordBatch) -> Result<AnomalyReport> {
        let (window_start, window_end) = batch.window_bounds().ok_or(AnomalyError::EmptyWindow)?;

        let results: Vec<Result<DetectorAnomaly>> = if self.parallel {
            self.detectors
                .par_iter_mut()
                .map(|detector| evaluate(detector.as_mut(), batch))
                .collect()
        } else {
            self.detectors
                .iter_mut()
                .map(|detector| evaluate(detector.as_mut(), batch))
                .collect()
        };
        // first failure in configuration order wins
        let anomalies = results.into_iter().collect::<Result<Vec<_>>>()?;

        let report = AnomalyReport::new(Utc::now(), window_start, window_end, anomalies)?;
        info!(
            detectors = report.len(),
            highest_severity = report.highest_severity(),
            rows = batch.len(),
            "anomaly detection complete"
        );
        Ok(report)
    }
}

impl std::fmt::Debug for DetectorEnsemble {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectorEnsemble")
            .field("detectors", &self.names())
            .field("parallel", &self.parallel)
            .finish()
    }
}

fn evaluate(detector: &mut dyn AnomalyDetector, batch: &RecordBatch) -> Result<DetectorAnomaly> {
    let name = detector.name().to_string();
    let attach = |error: AnomalyError| {
        if error.detector() == Some(name.as_str()) {
            error
        } else {
            AnomalyError::in_detector(name.clone(), error)
        }
    };

    let scores = detector.fit_predict(batch).map_err(attach)?;
    if scores.len() != batch.len() {
        return Err(AnomalyError::ScoreCountMismatch {
            detector: name,
            expected: batch.len(),
            got: scores.len(),
        });
    }
    if let Some(&score) = scores.iter().find(|s| !s.is_finite()) {
        return Err(AnomalyError::NonFiniteScore {
            detector: name,
            score,
        });
    }

    let score = if scores.is_empty() {
        SCORE_FLOOR
    } else {
        stats::mean(&scores)
    };
    let severity = detector.severity(&scores).map_err(attach)?;
    if !severity.is_finite() {
        return Err(AnomalyError::NonFiniteSeverity {
            detector: name,
            severity,
        });
    }

    debug!(detector = %name, score, severity, "detector evaluated");
    Ok(DetectorAnomaly::new(name, score, severity))
}
