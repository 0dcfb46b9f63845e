//! Single aggregate metric.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One named statistic over a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub metric: String,
    /// May be NaN, e.g. the sample deviation of a single row.
    pub value: f64,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<BTreeMap<String, f64>>,
}

impl Aggregate {
    pub fn new(
        metric: impl Into<String>,
        value: f64,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Self {
        Self {
            metric: metric.into(),
            value,
            window_start,
            window_end,
            extra: None,
        }
    }

    /// Attach an extra numeric attribute.
    pub fn with_extra(mut self, key: impl Into<String>, value: f64) -> Self {
        self.extra
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value);
        self
    }
}
