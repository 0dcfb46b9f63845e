//! Ordered aggregate collection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Aggregate;
use crate::error::{AggregateError, Result};

/// Aggregates computed over one batch, in computation order.
///
/// Metric names are unique and every window is well ordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateCollection {
    aggregates: Vec<Aggregate>,
}

impl AggregateCollection {
    /// Build a collection, rejecting duplicate metrics and inverted windows.
    pub fn new(aggregates: Vec<Aggregate>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(aggregates.len());
        for aggregate in &aggregates {
            if aggregate.window_start > aggregate.window_end {
                return Err(AggregateError::InvertedWindow {
                    metric: aggregate.metric.clone(),
                });
            }
            if !seen.insert(aggregate.metric.as_str()) {
                return Err(AggregateError::DuplicateMetric(aggregate.metric.clone()));
            }
        }
        Ok(Self { aggregates })
    }

    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Aggregate> {
        self.aggregates.iter()
    }

    pub fn as_slice(&self) -> &[Aggregate] {
        &self.aggregates
    }

    /// Look up a metric by name.
    pub fn get(&self, metric: &str) -> Option<&Aggregate> {
        self.aggregates.iter().find(|a| a.metric == metric)
    }

    /// Value of a metric by name.
    pub fn value(&self, metric: &str) -> Option<f64> {
        self.get(metric).map(|a| a.value)
    }

    /// Metric names in order.
    pub fn metrics(&self) -> Vec<&str> {
        self.aggregates.iter().map(|a| a.metric.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a AggregateCollection {
    type Item = &'a Aggregate;
    type IntoIter = std::slice::Iter<'a, Aggregate>;

    fn into_iter(self) -> Self::IntoIter {
        self.aggregates.iter()
    }
}
