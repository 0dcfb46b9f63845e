//! Stdout sink.

use anomaly_spi::AnomalyReport;
use pipeline_spi::{AlertSink, PipelineError, Result};
use tracing::info;

use super::AlertPayload;

/// Prints the alert payload as pretty JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl AlertSink for StdoutSink {
    fn name(&self) -> &str {
        "stdout"
    }

    fn send(&self, report: &AnomalyReport) -> Result<()> {
        let body = serde_json::to_string_pretty(&AlertPayload::from_report(report))
            .map_err(|e| PipelineError::delivery(self.name(), e))?;
        println!("{body}");
        info!(sink = self.name(), max_severity = report.highest_severity(), "alert emitted");
        Ok(())
    }
}
