//! Result of one completed run.

use aggregate_spi::AggregateCollection;
use anomaly_spi::AnomalyReport;
use serde::Serialize;

use super::PipelineState;

/// Everything a successful run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub final_state: PipelineState,
    pub rows_loaded: usize,
    pub aggregates: AggregateCollection,
    pub report: AnomalyReport,
    pub alerted: bool,
}
