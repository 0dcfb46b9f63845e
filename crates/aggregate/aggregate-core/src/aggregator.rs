//! Window aggregation.

use std::collections::BTreeMap;

use aggregate_api::{FeatureConfig, WindowSpec};
use aggregate_spi::{Aggregate, AggregateCollection, AggregateError, Result};
use batch_spi::{EventRecord, RecordBatch};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::stats;

/// Computes base, per-chain and trailing-window statistics over a batch.
///
/// Output order is fixed: base metrics, then per-chain metrics by ascending
/// chain id, then trailing windows in configuration order. Every metric
/// ends at the batch's latest `event_time`.
///
/// # Example
///
/// ```rust,ignore
/// let aggregator = WindowAggregator::new(["5m", "1h"]);
/// let collection = aggregator.aggregate(&batch)?;
/// println!("rows: {:?}", collection.value("count"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct WindowAggregator {
    windows: Vec<String>,
}

impl WindowAggregator {
    pub fn new<I, S>(windows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            windows: windows.into_iter().map(Into::into).collect(),
        }
    }

    /// Create from configuration.
    pub fn from_config(config: &FeatureConfig) -> Self {
        Self::new(config.windows.iter().cloned())
    }

    pub fn windows(&self) -> &[String] {
        &self.windows
    }

    /// Aggregate one non-empty batch.
    ///
    /// Fails with [`AggregateError::EmptyWindow`] on an empty batch and with
    /// [`AggregateError::InvalidWindowSpec`] if any configured window does
    /// not parse; nothing is returned in either case.
    pub fn aggregate(&self, batch: &RecordBatch) -> Result<AggregateCollection> {
        let specs = self
            .windows
            .iter()
            .map(|w| w.parse::<WindowSpec>())
            .collect::<Result<Vec<_>>>()?;

        let sorted = batch.sorted_by_event_time();
        let (window_start, window_end) = sorted.window_bounds().ok_or(AggregateError::EmptyWindow)?;

        let mut aggregates = base_metrics(&sorted, window_start, window_end);
        aggregates.extend(chain_metrics(&sorted, window_start, window_end));
        aggregates.extend(trailing_metrics(&sorted, &specs, window_end));

        debug!(
            rows = sorted.len(),
            metrics = aggregates.len(),
            %window_start,
            %window_end,
            "aggregated window"
        );
        AggregateCollection::new(aggregates)
    }
}

fn base_metrics(
    batch: &RecordBatch,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<Aggregate> {
    let values = batch.values();
    let calldata = batch.calldata_sizes();
    let high_calldata = batch.iter().filter(|r| r.is_high_calldata()).count();
    let rows = batch.len() as f64;

    let metric = |name: &str, value: f64| Aggregate::new(name, value, window_start, window_end);
    vec![
        metric("count", rows),
        metric("mean_value", stats::mean(&values)),
        metric("std_value", stats::sample_std(&values)),
        metric("p95_value", stats::quantile(&values, 0.95)),
        metric("p05_value", stats::quantile(&values, 0.05)),
        metric("mean_gas_used", stats::mean(&batch.gas_used())),
        metric("median_calldata", stats::median(&calldata)),
        metric("high_calldata_ratio", high_calldata as f64 / rows),
    ]
}

fn chain_metrics(
    batch: &RecordBatch,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<Aggregate> {
    let mut groups: BTreeMap<u64, Vec<&EventRecord>> = BTreeMap::new();
    for record in batch {
        groups.entry(record.chain_id).or_default().push(record);
    }

    groups
        .into_iter()
        .flat_map(|(chain_id, rows)| {
            let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
            [
                Aggregate::new(
                    format!("count_chain_{chain_id}"),
                    rows.len() as f64,
                    window_start,
                    window_end,
                ),
                Aggregate::new(
                    format!("mean_value_chain_{chain_id}"),
                    stats::mean(&values),
                    window_start,
                    window_end,
                ),
            ]
        })
        .collect()
}

fn trailing_metrics(
    batch: &RecordBatch,
    specs: &[WindowSpec],
    window_end: DateTime<Utc>,
) -> Vec<Aggregate> {
    let mut metrics = Vec::with_capacity(specs.len() * 2);
    for spec in specs {
        // An out-of-range lookback covers the whole batch.
        let subset = match window_end.checked_sub_signed(spec.duration()) {
            Some(cutoff) => batch.filter(|r| r.event_time >= cutoff),
            None => batch.clone(),
        };
        let Some((subset_start, _)) = subset.window_bounds() else {
            debug!(window = %spec, "trailing window empty, skipped");
            continue;
        };

        let lookback = spec.duration().num_milliseconds() as f64 / 1000.0;
        metrics.push(
            Aggregate::new(
                format!("count_last_{spec}"),
                subset.len() as f64,
                subset_start,
                window_end,
            )
            .with_extra("lookback_seconds", lookback),
        );
        metrics.push(
            Aggregate::new(
                format!("mean_value_last_{spec}"),
                stats::mean(&subset.values()),
                subset_start,
                window_end,
            )
            .with_extra("lookback_seconds", lookback),
        );
    }
    metrics
}
