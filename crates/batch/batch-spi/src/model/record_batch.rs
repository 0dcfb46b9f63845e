//! Immutable batch of event rows.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EventRecord;

/// Row-aligned view over one window of events.
///
/// A batch never changes after construction; sorting and filtering return
/// new batches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordBatch {
    records: Vec<EventRecord>,
}

impl RecordBatch {
    /// Create a batch from rows, keeping their order.
    pub fn new(records: Vec<EventRecord>) -> Self {
        Self { records }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EventRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<EventRecord> {
        self.records
    }

    /// `value` column.
    pub fn values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.value).collect()
    }

    /// `gas_used` column.
    pub fn gas_used(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.gas_used).collect()
    }

    /// `calldata_size` column widened to floats.
    pub fn calldata_sizes(&self) -> Vec<f64> {
        self.records
            .iter()
            .map(|r| f64::from(r.calldata_size))
            .collect()
    }

    /// Row-major `[value, attribute, gas_used, calldata_size]` matrix.
    pub fn feature_matrix(&self) -> Vec<[f64; 4]> {
        self.records.iter().map(EventRecord::features).collect()
    }

    /// Distinct chain ids in ascending order.
    pub fn chain_ids(&self) -> BTreeSet<u64> {
        self.records.iter().map(|r| r.chain_id).collect()
    }

    /// Copy of this batch stably sorted by `event_time`.
    pub fn sorted_by_event_time(&self) -> RecordBatch {
        let mut records = self.records.clone();
        records.sort_by_key(|r| r.event_time);
        RecordBatch { records }
    }

    /// Copy of this batch keeping the rows matching `predicate`.
    pub fn filter<P>(&self, mut predicate: P) -> RecordBatch
    where
        P: FnMut(&EventRecord) -> bool,
    {
        RecordBatch {
            records: self
                .records
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        }
    }

    /// Earliest and latest `event_time`, or `None` for an empty batch.
    pub fn window_bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.records.iter().map(|r| r.event_time).min()?;
        let end = self.records.iter().map(|r| r.event_time).max()?;
        Some((start, end))
    }

    /// Concatenate batches in order.
    pub fn concat<I>(batches: I) -> RecordBatch
    where
        I: IntoIterator<Item = RecordBatch>,
    {
        RecordBatch {
            records: batches.into_iter().flat_map(|b| b.records).collect(),
        }
    }
}

impl From<Vec<EventRecord>> for RecordBatch {
    fn from(records: Vec<EventRecord>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a RecordBatch {
    type Item = &'a EventRecord;
    type IntoIter = std::slice::Iter<'a, EventRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(second: u32, chain_id: u64, value: f64) -> EventRecord {
        EventRecord {
            event_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, second).unwrap(),
            entity_id: 1,
            chain_id,
            block_number: 42,
            contract_address: "0x1".to_string(),
            tx_hash: format!("0x{second}"),
            value,
            attribute: 0.5,
            gas_used: 21_000.0,
            calldata_size: 128,
        }
    }

    #[test]
    fn test_sorted_by_event_time_is_stable_and_copies() {
        let batch = RecordBatch::new(vec![
            record(30, 1, 3.0),
            record(10, 1, 1.0),
            record(30, 137, 4.0),
            record(20, 10, 2.0),
        ]);

        let sorted = batch.sorted_by_event_time();

        assert_eq!(sorted.values(), vec![1.0, 2.0, 3.0, 4.0]);
        // original untouched
        assert_eq!(batch.values(), vec![3.0, 1.0, 4.0, 2.0]);
    }

    #[test]
    fn test_window_bounds() {
        let batch = RecordBatch::new(vec![record(5, 1, 1.0), record(1, 1, 2.0), record(9, 1, 3.0)]);
        let (start, end) = batch.window_bounds().unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 1).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 9).unwrap());
    }

    #[test]
    fn test_window_bounds_empty() {
        assert!(RecordBatch::default().window_bounds().is_none());
    }

    #[test]
    fn test_chain_ids_ascending() {
        let batch = RecordBatch::new(vec![record(1, 137, 1.0), record(2, 1, 1.0), record(3, 56, 1.0)]);
        let ids: Vec<u64> = batch.chain_ids().into_iter().collect();
        assert_eq!(ids, vec![1, 56, 137]);
    }

    #[test]
    fn test_filter_returns_new_batch() {
        let batch = RecordBatch::new(vec![record(1, 1, 1.0), record(2, 137, 2.0)]);
        let filtered = batch.filter(|r| r.chain_id == 137);
        assert_eq!(filtered.len(), 1);
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_serde_transparent() {
        let batch = RecordBatch::new(vec![record(1, 1, 1.0)]);
        let json = serde_json::to_value(&batch).unwrap();
        assert!(json.is_array());
        let back: RecordBatch = serde_json::from_value(json).unwrap();
        assert_eq!(back, batch);
    }

    #[test]
    fn test_high_calldata_threshold_is_exclusive() {
        let mut r = record(1, 1, 1.0);
        r.calldata_size = 1024;
        assert!(!r.is_high_calldata());
        r.calldata_size = 1025;
        assert!(r.is_high_calldata());
    }
}
