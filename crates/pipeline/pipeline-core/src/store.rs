//! In-memory event store.

use aggregate_spi::AggregateCollection;
use anomaly_spi::AnomalyReport;
use batch_spi::{EventRecord, RecordBatch};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use pipeline_api::{StorageConfig, WindowAnchor};
use pipeline_spi::{PipelineError, Result, Storage};
use tracing::debug;

#[derive(Debug, Default)]
struct Tables {
    ready: bool,
    events: Vec<EventRecord>,
    aggregates: Vec<AggregateCollection>,
    reports: Vec<AnomalyReport>,
}

/// [`Storage`] backed by process memory.
///
/// The latest window holds every event at or after `anchor - lookback`.
/// Tables must be created with [`Storage::ensure_schema`] before use.
#[derive(Debug)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    lookback: Duration,
    anchor: WindowAnchor,
}

impl InMemoryStore {
    pub fn new(lookback: Duration, anchor: WindowAnchor) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            lookback,
            anchor,
        }
    }

    /// Create from configuration.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        Ok(Self::new(config.lookback_duration()?, config.anchor))
    }

    pub fn lookback(&self) -> Duration {
        self.lookback
    }

    /// Events with `event_time >= end - lookback`, sorted by `event_time`.
    pub fn read_window_ending(&self, end: DateTime<Utc>) -> Result<RecordBatch> {
        let since = end
            .checked_sub_signed(self.lookback)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let tables = self.tables.read();
        require_schema(&tables)?;

        let window = RecordBatch::new(
            tables
                .events
                .iter()
                .filter(|e| e.event_time >= since)
                .cloned()
                .collect(),
        )
        .sorted_by_event_time();
        if window.is_empty() {
            return Err(PipelineError::EmptyWindow { since });
        }
        debug!(rows = window.len(), %since, "read latest window");
        Ok(window)
    }

    pub fn event_count(&self) -> usize {
        self.tables.read().events.len()
    }

    /// Persisted aggregate collections, oldest first.
    pub fn aggregates(&self) -> Vec<AggregateCollection> {
        self.tables.read().aggregates.clone()
    }

    /// Persisted reports, oldest first.
    pub fn reports(&self) -> Vec<AnomalyReport> {
        self.tables.read().reports.clone()
    }

    pub fn latest_report(&self) -> Option<AnomalyReport> {
        self.tables.read().reports.last().cloned()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(Duration::days(1), WindowAnchor::WallClock)
    }
}

fn require_schema(tables: &Tables) -> Result<()> {
    if tables.ready {
        Ok(())
    } else {
        Err(PipelineError::Storage(
            "schema not initialised, call ensure_schema first".to_string(),
        ))
    }
}

impl Storage for InMemoryStore {
    fn ensure_schema(&self) -> Result<()> {
        self.tables.write().ready = true;
        Ok(())
    }

    fn ingest_batch(&self, batch: &RecordBatch) -> Result<usize> {
        let mut tables = self.tables.write();
        require_schema(&tables)?;
        tables.events.extend(batch.iter().cloned());
        Ok(batch.len())
    }

    fn read_latest_window(&self) -> Result<RecordBatch> {
        let end = match self.anchor {
            WindowAnchor::WallClock => Utc::now(),
            WindowAnchor::LatestEvent => {
                let latest = self.tables.read().events.iter().map(|e| e.event_time).max();
                match latest {
                    Some(latest) => latest,
                    None => {
                        return Err(PipelineError::EmptyWindow {
                            since: Utc::now() - self.lookback,
                        })
                    }
                }
            }
        };
        self.read_window_ending(end)
    }

    fn persist_aggregates(&self, aggregates: &AggregateCollection) -> Result<()> {
        let mut tables = self.tables.write();
        require_schema(&tables)?;
        tables.aggregates.push(aggregates.clone());
        Ok(())
    }

    fn persist_report(&self, report: &AnomalyReport) -> Result<()> {
        let mut tables = self.tables.write();
        require_schema(&tables)?;
        tables.reports.push(report.clone());
        Ok(())
    }
}
