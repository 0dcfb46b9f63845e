//! Collecting sink.

use std::sync::Arc;

use anomaly_spi::AnomalyReport;
use parking_lot::Mutex;
use pipeline_spi::{AlertSink, Result};

/// Keeps every report it receives. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    sent: Arc<Mutex<Vec<AnomalyReport>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<AnomalyReport> {
        self.sent.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }
}

impl AlertSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn send(&self, report: &AnomalyReport) -> Result<()> {
        self.sent.lock().push(report.clone());
        Ok(())
    }
}
