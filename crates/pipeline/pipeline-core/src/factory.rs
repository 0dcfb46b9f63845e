//! Build a runnable pipeline from configuration.

use std::sync::Arc;

use aggregate_core::WindowAggregator;
use anomaly_api::{AlertingConfig, SinkKind};
use anomaly_core::{DetectorEnsemble, DetectorRegistry};
use batch_api::{SourceConfig, SourceKind, SyntheticConfig};
use batch_core::{ColumnQualityChecker, NdjsonSource, SyntheticGenerator};
use batch_spi::{BatchSource, QualityChecker};
use pipeline_api::{PipelineConfig, QualityConfig};
use pipeline_spi::{AlertSink, PipelineError, Result};
use tracing::info;

use crate::{DatasetLoader, InMemoryStore, PipelineOrchestrator, StdoutSink};

/// A wired orchestrator plus a handle on the store it writes to.
#[derive(Debug)]
pub struct BuiltPipeline {
    pub orchestrator: PipelineOrchestrator,
    pub store: Arc<InMemoryStore>,
}

/// Validate `config` and wire every component it names.
///
/// Detectors are resolved through `registry`, so callers can add
/// implementations before building.
pub fn build_pipeline(config: &PipelineConfig, registry: &DetectorRegistry) -> Result<BuiltPipeline> {
    config.validate()?;

    let store = Arc::new(InMemoryStore::from_config(&config.storage)?);
    let mut loader = DatasetLoader::new(build_source(&config.source, &config.dataset)?, store.clone());
    if let Some(checker) = build_quality_checker(&config.quality) {
        loader = loader.with_quality_checker(checker);
    }

    let ensemble = build_ensemble(registry, config)?;
    let sink = build_alert_sink(&config.alerting)?;
    info!(
        source = ?config.source.kind,
        detectors = ?ensemble.names(),
        sink = sink.name(),
        "pipeline built"
    );

    let orchestrator = PipelineOrchestrator::new(
        Box::new(loader),
        store.clone(),
        WindowAggregator::from_config(&config.features),
        ensemble,
        sink,
    )
    .with_alerting(config.alerting.enabled, config.alerting.threshold_score);

    Ok(BuiltPipeline { orchestrator, store })
}

pub fn build_source(source: &SourceConfig, dataset: &SyntheticConfig) -> Result<Box<dyn BatchSource>> {
    match source.kind {
        SourceKind::Synthetic => Ok(Box::new(SyntheticGenerator::new(dataset.clone())?)),
        SourceKind::File => {
            let file = source
                .file
                .as_ref()
                .ok_or_else(|| PipelineError::config("source.file is required for a file source"))?;
            Ok(Box::new(NdjsonSource::from_config(file)?))
        }
    }
}

/// `None` when no check is configured.
pub fn build_quality_checker(config: &QualityConfig) -> Option<Box<dyn QualityChecker>> {
    if config.is_noop() {
        None
    } else {
        Some(Box::new(ColumnQualityChecker::from_config(config)))
    }
}

pub fn build_ensemble(registry: &DetectorRegistry, config: &PipelineConfig) -> Result<DetectorEnsemble> {
    Ok(DetectorEnsemble::from_config(registry, &config.anomaly_detection)?)
}

pub fn build_alert_sink(config: &AlertingConfig) -> Result<Box<dyn AlertSink>> {
    match config.sink {
        SinkKind::Stdout => Ok(Box::new(StdoutSink)),
        #[cfg(feature = "webhook")]
        SinkKind::Http => Ok(Box::new(crate::HttpSink::from_config(config)?)),
        #[cfg(feature = "webhook")]
        SinkKind::Slack => Ok(Box::new(crate::SlackSink::from_config(config)?)),
        #[cfg(not(feature = "webhook"))]
        SinkKind::Http | SinkKind::Slack => Err(PipelineError::config(format!(
            "alert sink {:?} requires the webhook feature",
            config.sink
        ))),
    }
}
