//! Row-level quality filtering.

use std::collections::HashSet;

use batch_api::QualityConfig;
use batch_spi::{BatchError, Column, QualityChecker, RecordBatch, Result};
use tracing::warn;

/// Drops rows with missing required columns, then de-duplicates on a key.
///
/// The first occurrence of each key tuple wins.
#[derive(Debug, Clone, Default)]
pub struct ColumnQualityChecker {
    required_columns: Vec<Column>,
    dedup_keys: Vec<Column>,
}

impl ColumnQualityChecker {
    pub fn new(required_columns: Vec<Column>, dedup_keys: Vec<Column>) -> Self {
        Self {
            required_columns,
            dedup_keys,
        }
    }

    /// Create from configuration.
    pub fn from_config(config: &QualityConfig) -> Self {
        Self::new(config.required_columns.clone(), config.dedup_keys.clone())
    }

    fn drop_missing(&self, batch: &RecordBatch) -> RecordBatch {
        if self.required_columns.is_empty() {
            return batch.clone();
        }
        let kept = batch.filter(|r| !self.required_columns.iter().any(|c| c.is_missing(r)));
        let removed = batch.len() - kept.len();
        if removed > 0 {
            warn!(removed, "quality: dropped rows with missing values");
        }
        kept
    }

    fn drop_duplicates(&self, batch: RecordBatch) -> RecordBatch {
        if self.dedup_keys.is_empty() {
            return batch;
        }
        let before = batch.len();
        let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(before);
        let kept = batch.filter(|r| {
            let key: Vec<String> = self.dedup_keys.iter().map(|c| c.key_of(r)).collect();
            seen.insert(key)
        });
        let removed = before - kept.len();
        if removed > 0 {
            let keys: Vec<&str> = self.dedup_keys.iter().map(Column::as_str).collect();
            warn!(removed, keys = ?keys, "quality: deduplicated rows");
        }
        kept
    }
}

impl QualityChecker for ColumnQualityChecker {
    fn validate(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let cleaned = self.drop_duplicates(self.drop_missing(batch));
        if cleaned.is_empty() {
            return Err(BatchError::EmptyAfterQuality {
                removed: batch.len(),
            });
        }
        Ok(cleaned)
    }
}
