//! Window-level anomaly report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DetectorAnomaly;
use crate::error::{AnomalyError, Result};

/// Highest severity of a report with no detector results.
pub const SEVERITY_FLOOR: f64 = 0.0;

/// Results of every detector over one window, in configuration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub generated_at: DateTime<Utc>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub anomalies: Vec<DetectorAnomaly>,
}

impl AnomalyReport {
    /// Create a report; fails if `window_start` is after `window_end`.
    pub fn new(
        generated_at: DateTime<Utc>,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        anomalies: Vec<DetectorAnomaly>,
    ) -> Result<Self> {
        if window_start > window_end {
            return Err(AnomalyError::invalid(
                "window",
                format!("start {window_start} is after end {window_end}"),
            ));
        }
        Ok(Self {
            generated_at,
            window_start,
            window_end,
            anomalies,
        })
    }

    /// Maximum severity over all detectors, or [`SEVERITY_FLOOR`] when empty.
    pub fn highest_severity(&self) -> f64 {
        self.anomalies
            .iter()
            .map(|a| a.severity)
            .fold(None, |max: Option<f64>, s| Some(max.map_or(s, |m| m.max(s))))
            .unwrap_or(SEVERITY_FLOOR)
    }

    /// Result for a named detector.
    pub fn anomaly(&self, detector: &str) -> Option<&DetectorAnomaly> {
        self.anomalies.iter().find(|a| a.detector == detector)
    }

    /// Detector names in report order.
    pub fn detectors(&self) -> Vec<&str> {
        self.anomalies.iter().map(|a| a.detector.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.anomalies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anomalies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn report(severities: &[f64]) -> AnomalyReport {
        let anomalies = severities
            .iter()
            .enumerate()
            .map(|(i, &s)| DetectorAnomaly::new(format!("det{}", i + 1), 0.0, s))
            .collect();
        AnomalyReport::new(t0(), t0(), t0() + Duration::minutes(4), anomalies).unwrap()
    }

    #[test]
    fn test_highest_severity() {
        assert_eq!(report(&[0.2, 0.9, 0.5]).highest_severity(), 0.9);
    }

    #[test]
    fn test_highest_severity_empty_is_floor() {
        assert_eq!(report(&[]).highest_severity(), SEVERITY_FLOOR);
    }

    #[test]
    fn test_highest_severity_all_negative() {
        // Floor applies only to an empty report.
        assert_eq!(report(&[-3.0, -1.0]).highest_severity(), -1.0);
    }

    #[test]
    fn test_inverted_window_rejected() {
        let result = AnomalyReport::new(t0(), t0() + Duration::seconds(1), t0(), vec![]);
        assert!(matches!(
            result,
            Err(AnomalyError::InvalidParameter { ref name, .. }) if name == "window"
        ));
    }

    #[test]
    fn test_lookup_and_order() {
        let report = report(&[0.1, 0.2]);
        assert_eq!(report.detectors(), vec!["det1", "det2"]);
        assert_eq!(report.anomaly("det2").map(|a| a.severity), Some(0.2));
        assert!(report.anomaly("missing").is_none());
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_json_round_trip_keeps_timestamps() {
        let report = report(&[0.4]);
        let json = serde_json::to_string(&report).unwrap();
        let back: AnomalyReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
