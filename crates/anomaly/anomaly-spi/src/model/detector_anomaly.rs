//! Per-detector result.

use serde::{Deserialize, Serialize};

/// Outcome of one detector over one window.
///
/// `score` is the mean of the detector's per-row scores; `severity` is the
/// detector's own reduction. The two are independent numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorAnomaly {
    pub detector: String,
    pub score: f64,
    pub severity: f64,
    pub description: String,
}

impl DetectorAnomaly {
    /// Create a result with the standard description.
    pub fn new(detector: impl Into<String>, score: f64, severity: f64) -> Self {
        let detector = detector.into();
        let description = format!("{detector} severity={severity:.3} score={score:.3}");
        Self {
            detector,
            score,
            severity,
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_names_detector_and_severity() {
        let anomaly = DetectorAnomaly::new("zscore", 0.5, 0.25);
        assert_eq!(anomaly.detector, "zscore");
        assert_eq!(anomaly.description, "zscore severity=0.250 score=0.500");
    }

    #[test]
    fn test_serialization() {
        let anomaly = DetectorAnomaly::new("iqr", 1.0, 0.9);
        let json = serde_json::to_value(&anomaly).unwrap();
        assert_eq!(json["detector"], "iqr");
        assert_eq!(json["severity"], 0.9);
    }
}
