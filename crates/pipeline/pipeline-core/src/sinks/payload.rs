//! Wire formats for alert delivery.

use anomaly_spi::{AnomalyReport, DetectorAnomaly};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// JSON body posted by the webhook sink and printed by the stdout sink.
#[derive(Debug, Clone, Serialize)]
pub struct AlertPayload<'a> {
    pub generated_at: DateTime<Utc>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub max_severity: f64,
    pub anomalies: &'a [DetectorAnomaly],
}

impl<'a> AlertPayload<'a> {
    pub fn from_report(report: &'a AnomalyReport) -> Self {
        Self {
            generated_at: report.generated_at,
            window_start: report.window_start,
            window_end: report.window_end,
            max_severity: report.highest_severity(),
            anomalies: &report.anomalies,
        }
    }
}

/// Slack text: a header, the window, then one line per detector.
pub fn slack_message(report: &AnomalyReport) -> String {
    let mut lines = vec![
        format!("*Anomaly alert* severity={:.3}", report.highest_severity()),
        format!(
            "window: {} to {}",
            report.window_start.to_rfc3339(),
            report.window_end.to_rfc3339()
        ),
    ];
    lines.extend(report.anomalies.iter().map(|a| {
        format!(
            "- `{}` score={:.3} severity={:.3}",
            a.detector, a.score, a.severity
        )
    }));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn report() -> AnomalyReport {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        AnomalyReport::new(
            t0 + Duration::minutes(5),
            t0,
            t0 + Duration::minutes(4),
            vec![
                DetectorAnomaly::new("zscore", 0.5, 0.2),
                DetectorAnomaly::new("iqr", 1.0, 0.9),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_payload_fields() {
        let report = report();
        let json = serde_json::to_value(AlertPayload::from_report(&report)).unwrap();
        assert_eq!(json["max_severity"], 0.9);
        assert_eq!(json["window_start"], "2024-01-01T00:00:00Z");
        assert_eq!(json["anomalies"][1]["detector"], "iqr");
        assert_eq!(json["anomalies"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_slack_message() {
        let text = slack_message(&report());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "*Anomaly alert* severity=0.900");
        assert_eq!(
            lines[1],
            "window: 2024-01-01T00:00:00+00:00 to 2024-01-01T00:04:00+00:00"
        );
        assert_eq!(lines[2], "- `zscore` score=0.500 severity=0.200");
        assert_eq!(lines.len(), 4);
    }
}
