//! Alert decision rule.

use anomaly_spi::AnomalyReport;
use tracing::info;

/// True when the report's highest severity reaches `threshold`.
///
/// A NaN threshold never fires.
pub fn is_alert(report: &AnomalyReport, threshold: f64) -> bool {
    report.highest_severity() >= threshold
}

/// Outcome of the alert rule for one report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertDecision {
    pub highest_severity: f64,
    pub threshold: f64,
    pub fired: bool,
}

impl AlertDecision {
    /// Apply [`is_alert`] and log the outcome.
    pub fn evaluate(report: &AnomalyReport, threshold: f64) -> Self {
        let decision = Self {
            highest_severity: report.highest_severity(),
            threshold,
            fired: is_alert(report, threshold),
        };
        info!(
            highest_severity = decision.highest_severity,
            threshold,
            fired = decision.fired,
            "alert decision"
        );
        decision
    }
}
