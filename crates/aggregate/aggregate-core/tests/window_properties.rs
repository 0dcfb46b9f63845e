//! Property tests for window aggregation.

use aggregate_core::WindowAggregator;
use batch_spi::{EventRecord, RecordBatch};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

fn row_strategy() -> impl Strategy<Value = (i64, u64, f64, u32)> {
    (
        0i64..86_400,
        prop::sample::select(vec![1u64, 10, 56, 137]),
        -1.0e6f64..1.0e6,
        0u32..8192,
    )
}

fn batch_strategy() -> impl Strategy<Value = RecordBatch> {
    prop::collection::vec(row_strategy(), 1..64).prop_map(|rows| {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        RecordBatch::new(
            rows.into_iter()
                .enumerate()
                .map(|(i, (offset, chain_id, value, calldata_size))| EventRecord {
                    event_time: base + Duration::seconds(offset),
                    entity_id: i as u64,
                    chain_id,
                    block_number: 1,
                    contract_address: "0xabc".to_string(),
                    tx_hash: format!("0x{i:x}"),
                    value,
                    attribute: 0.5,
                    gas_used: 21_000.0,
                    calldata_size,
                })
                .collect(),
        )
    })
}

fn aggregator() -> WindowAggregator {
    WindowAggregator::new(["30s", "5m", "1h", "2d"])
}

proptest! {
    #[test]
    fn count_equals_batch_size(batch in batch_strategy()) {
        let result = aggregator().aggregate(&batch).unwrap();
        prop_assert_eq!(result.value("count"), Some(batch.len() as f64));
    }

    #[test]
    fn high_calldata_ratio_is_a_fraction(batch in batch_strategy()) {
        let ratio = aggregator().aggregate(&batch).unwrap().value("high_calldata_ratio").unwrap();
        prop_assert!((0.0..=1.0).contains(&ratio));
    }

    #[test]
    fn trailing_windows_end_with_the_batch(batch in batch_strategy()) {
        let (_, batch_end) = batch.window_bounds().unwrap();
        let result = aggregator().aggregate(&batch).unwrap();
        for aggregate in result.iter().filter(|a| a.metric.contains("_last_")) {
            prop_assert_eq!(aggregate.window_end, batch_end);
            prop_assert!(aggregate.window_start <= aggregate.window_end);
        }
    }

    #[test]
    fn trailing_count_matches_filtered_rows(batch in batch_strategy()) {
        let (_, batch_end) = batch.window_bounds().unwrap();
        let result = aggregator().aggregate(&batch).unwrap();
        let expected = batch
            .iter()
            .filter(|r| r.event_time >= batch_end - Duration::minutes(5))
            .count();
        // never empty: the latest row is always inside its own window
        prop_assert_eq!(result.value("count_last_5m"), Some(expected as f64));
    }

    #[test]
    fn chain_counts_sum_to_total(batch in batch_strategy()) {
        let result = aggregator().aggregate(&batch).unwrap();
        let total: f64 = result
            .iter()
            .filter(|a| a.metric.starts_with("count_chain_"))
            .map(|a| a.value)
            .sum();
        prop_assert_eq!(total, batch.len() as f64);
    }

    #[test]
    fn aggregation_is_bit_identical_on_rerun(batch in batch_strategy()) {
        let a = aggregator().aggregate(&batch).unwrap();
        let b = aggregator().aggregate(&batch).unwrap();
        prop_assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            prop_assert_eq!(&x.metric, &y.metric);
            prop_assert_eq!(x.value.to_bits(), y.value.to_bits());
            prop_assert_eq!(x.window_start, y.window_start);
            prop_assert_eq!(x.window_end, y.window_end);
        }
    }
}
