//! Run orchestrator.

use std::sync::Arc;

use aggregate_core::WindowAggregator;
use anomaly_api::AlertingConfig;
use anomaly_core::{AlertDecision, DetectorEnsemble};
use pipeline_spi::{AlertSink, Loader, PipelineOutcome, PipelineState, Result, Storage};
use tracing::{error, info, warn};

/// Sequences load, aggregate, detect and alert for one run.
///
/// Each stage runs once, in order. The window is read from storage a single
/// time and shared by the aggregator and the ensemble. Any error moves the
/// run to [`PipelineState::Failed`] and is returned without retry.
pub struct PipelineOrchestrator {
    loader: Box<dyn Loader>,
    storage: Arc<dyn Storage>,
    aggregator: WindowAggregator,
    ensemble: DetectorEnsemble,
    sink: Box<dyn AlertSink>,
    alerts_enabled: bool,
    threshold: f64,
    state: PipelineState,
    history: Vec<PipelineState>,
}

impl PipelineOrchestrator {
    pub fn new(
        loader: Box<dyn Loader>,
        storage: Arc<dyn Storage>,
        aggregator: WindowAggregator,
        ensemble: DetectorEnsemble,
        sink: Box<dyn AlertSink>,
    ) -> Self {
        let alerting = AlertingConfig::default();
        Self {
            loader,
            storage,
            aggregator,
            ensemble,
            sink,
            alerts_enabled: alerting.enabled,
            threshold: alerting.threshold_score,
            state: PipelineState::Idle,
            history: vec![PipelineState::Idle],
        }
    }

    /// Set whether alerts are sent and the severity that triggers one.
    pub fn with_alerting(mut self, enabled: bool, threshold: f64) -> Self {
        self.alerts_enabled = enabled;
        self.threshold = threshold;
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// States visited by the current or last run, in order.
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Run every stage once.
    pub fn execute(&mut self) -> Result<PipelineOutcome> {
        self.state = PipelineState::Idle;
        self.history = vec![PipelineState::Idle];

        match self.run_stages() {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!(error = %e, failed_in = %self.state, "pipeline run failed");
                self.transition(PipelineState::Failed);
                Err(e)
            }
        }
    }

    fn run_stages(&mut self) -> Result<PipelineOutcome> {
        let rows_loaded = self.loader.load()?;
        self.transition(PipelineState::Loaded);

        let window = self.storage.read_latest_window()?;
        let aggregates = self.aggregator.aggregate(&window)?;
        self.storage.persist_aggregates(&aggregates)?;
        self.transition(PipelineState::Aggregated);

        let report = self.ensemble.run(&window)?;
        self.storage.persist_report(&report)?;
        self.transition(PipelineState::Detected);

        let decision = AlertDecision::evaluate(&report, self.threshold);
        let alerted = self.alerts_enabled && decision.fired;
        if alerted {
            self.sink.send(&report)?;
            self.transition(PipelineState::Alerted);
        } else {
            if decision.fired {
                warn!(sink = self.sink.name(), "alert suppressed, alerting disabled");
            }
            self.transition(PipelineState::Skipped);
        }
        self.transition(PipelineState::Done);

        Ok(PipelineOutcome {
            final_state: self.state,
            rows_loaded,
            aggregates,
            report,
            alerted,
        })
    }

    fn transition(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        info!(from = %self.state, state = ?next, "pipeline state");
        self.state = next;
        self.history.push(next);
    }
}

impl std::fmt::Debug for PipelineOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineOrchestrator")
            .field("ensemble", &self.ensemble)
            .field("sink", &self.sink.name())
            .field("alerts_enabled", &self.alerts_enabled)
            .field("threshold", &self.threshold)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryStore, MemorySink};
    use anomaly_spi::{AnomalyDetector, AnomalyError};
    use batch_spi::{EventRecord, RecordBatch};
    use chrono::{Duration, Utc};
    use pipeline_api::WindowAnchor;
    use pipeline_spi::PipelineError;

    struct StaticLoader {
        storage: Arc<InMemoryStore>,
        batch: RecordBatch,
    }

    impl Loader for StaticLoader {
        fn load(&mut self) -> Result<usize> {
            self.storage.ensure_schema()?;
            self.storage.ingest_batch(&self.batch)
        }
    }

    struct Fixed(&'static str, f64);

    impl AnomalyDetector for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn fit_predict(&mut self, batch: &RecordBatch) -> anomaly_spi::Result<Vec<f64>> {
            Ok(vec![self.1; batch.len()])
        }

        fn severity(&self, _scores: &[f64]) -> anomaly_spi::Result<f64> {
            Ok(self.1)
        }
    }

    fn fixed(name: &'static str, value: f64) -> Box<dyn AnomalyDetector> {
        Box::new(Fixed(name, value))
    }

    struct Broken;

    impl AnomalyDetector for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn fit_predict(&mut self, _batch: &RecordBatch) -> anomaly_spi::Result<Vec<f64>> {
            Err(AnomalyError::DetectionError("boom".to_string()))
        }

        fn severity(&self, _scores: &[f64]) -> anomaly_spi::Result<f64> {
            Ok(0.0)
        }
    }

    fn two_rows() -> RecordBatch {
        let end = Utc::now();
        let row = |at, chain_id, value, calldata_size| EventRecord {
            event_time: at,
            entity_id: 1,
            chain_id,
            block_number: 1,
            contract_address: "0xa".to_string(),
            tx_hash: format!("0x{chain_id}"),
            value,
            attribute: 0.5,
            gas_used: 21_000.0,
            calldata_size,
        };
        RecordBatch::new(vec![
            row(end - Duration::minutes(4), 1, 100.0, 128),
            row(end, 137, 200.0, 2048),
        ])
    }

    fn orchestrator(
        batch: RecordBatch,
        detectors: Vec<Box<dyn AnomalyDetector>>,
        sink: MemorySink,
    ) -> (PipelineOrchestrator, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new(Duration::days(1), WindowAnchor::LatestEvent));
        let loader = StaticLoader {
            storage: store.clone(),
            batch,
        };
        let orchestrator = PipelineOrchestrator::new(
            Box::new(loader),
            store.clone(),
            WindowAggregator::new(["5m"]),
            DetectorEnsemble::new(detectors).unwrap(),
            Box::new(sink),
        );
        (orchestrator, store)
    }

    #[test]
    fn test_alerting_run() {
        let sink = MemorySink::new();
        let (orchestrator, store) = orchestrator(
            two_rows(),
            vec![fixed("det1", 0.2), fixed("det2", 0.9)],
            sink.clone(),
        );
        let mut orchestrator = orchestrator.with_alerting(true, 0.8);

        let outcome = orchestrator.execute().unwrap();
        assert!(outcome.alerted);
        assert_eq!(outcome.rows_loaded, 2);
        assert_eq!(outcome.final_state, PipelineState::Done);
        assert_eq!(
            orchestrator.history(),
            &[
                PipelineState::Idle,
                PipelineState::Loaded,
                PipelineState::Aggregated,
                PipelineState::Detected,
                PipelineState::Alerted,
                PipelineState::Done,
            ]
        );
        assert_eq!(sink.count(), 1);
        assert_eq!(store.aggregates().len(), 1);
        assert_eq!(store.reports().len(), 1);
    }

    #[test]
    fn test_outputs_share_window_bounds() {
        let (mut orchestrator, _) =
            orchestrator(two_rows(), vec![fixed("det", 0.1)], MemorySink::new());
        let outcome = orchestrator.execute().unwrap();
        let count = outcome.aggregates.get("count").unwrap();
        assert_eq!(count.window_start, outcome.report.window_start);
        assert_eq!(count.window_end, outcome.report.window_end);
        assert_eq!(outcome.aggregates.value("count_last_5m"), Some(2.0));
    }

    #[test]
    fn test_below_threshold_skips() {
        let sink = MemorySink::new();
        let (orchestrator, _) =
            orchestrator(two_rows(), vec![fixed("det", 0.9)], sink.clone());
        let mut orchestrator = orchestrator.with_alerting(true, 0.95);
        let outcome = orchestrator.execute().unwrap();
        assert!(!outcome.alerted);
        assert!(orchestrator.history().contains(&PipelineState::Skipped));
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_disabled_alerting_skips() {
        let sink = MemorySink::new();
        let (orchestrator, _) =
            orchestrator(two_rows(), vec![fixed("det", 0.9)], sink.clone());
        let mut orchestrator = orchestrator.with_alerting(false, 0.5);
        assert!(!orchestrator.execute().unwrap().alerted);
        assert_eq!(orchestrator.state(), PipelineState::Done);
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_empty_window_fails_run() {
        let (mut orchestrator, store) =
            orchestrator(RecordBatch::default(), vec![], MemorySink::new());
        let error = orchestrator.execute().unwrap_err();
        assert!(error.is_empty_window());
        assert_eq!(orchestrator.state(), PipelineState::Failed);
        assert_eq!(
            orchestrator.history(),
            &[PipelineState::Idle, PipelineState::Loaded, PipelineState::Failed]
        );
        assert!(store.aggregates().is_empty());
    }

    #[test]
    fn test_detector_failure_fails_run_after_aggregation() {
        let broken: Box<dyn AnomalyDetector> = Box::new(Broken);
        let (mut orchestrator, store) = orchestrator(two_rows(), vec![broken], MemorySink::new());
        let error = orchestrator.execute().unwrap_err();
        match error {
            PipelineError::Anomaly(e) => assert_eq!(e.detector(), Some("broken")),
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(orchestrator.state(), PipelineState::Failed);
        assert!(store.reports().is_empty());
    }

    #[test]
    fn test_rerun_resets_history() {
        let (mut orchestrator, store) =
            orchestrator(two_rows(), vec![fixed("det", 0.0)], MemorySink::new());
        orchestrator.execute().unwrap();
        orchestrator.execute().unwrap();
        assert_eq!(orchestrator.history().first(), Some(&PipelineState::Idle));
        assert_eq!(orchestrator.history().len(), 6);
        assert_eq!(store.reports().len(), 2);
    }
}
