//! Seeded synthetic event generator.

use batch_api::SyntheticConfig;
use batch_spi::{BatchError, BatchSource, EventRecord, RecordBatch, Result};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::seq::index;
use rand_distr::Normal;
use tracing::debug;

const CHAIN_IDS: [u64; 4] = [1, 10, 56, 137];
const CHAIN_WEIGHTS: [f64; 4] = [0.45, 0.2, 0.15, 0.2];

const CONTRACT_POOL: [&str; 4] = [
    "0xA1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6e7f8a9b0",
    "0x1111111254eeb25477b68fb85ed929f73a960582",
    "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
    "0x00000000006c3852cbef3e08e8df289169ede581",
];

/// Generates realistic-looking chain events with injected spikes.
///
/// Rows count back one second at a time from the start instant, so the
/// first batch holds the most recent events. The same seed and start
/// produce the same rows.
#[derive(Debug)]
pub struct SyntheticGenerator {
    config: SyntheticConfig,
    start: DateTime<Utc>,
    rng: StdRng,
    chains: WeightedIndex<f64>,
    values: Normal<f64>,
}

impl SyntheticGenerator {
    /// Generator anchored at the current wall clock.
    pub fn new(config: SyntheticConfig) -> Result<Self> {
        Self::with_start(config, Utc::now().trunc_subsecs(0))
    }

    /// Generator anchored at a fixed instant.
    pub fn with_start(config: SyntheticConfig, start: DateTime<Utc>) -> Result<Self> {
        config.validate()?;
        let chains = WeightedIndex::new(CHAIN_WEIGHTS).map_err(|e| BatchError::InvalidParameter {
            name: "chain_weights".to_string(),
            reason: e.to_string(),
        })?;
        let values = Normal::new(100.0, 15.0).map_err(|e| BatchError::InvalidParameter {
            name: "value_distribution".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            start,
            chains,
            values,
        })
    }

    fn generate_batch(&mut self, size: usize, current: DateTime<Utc>, block_number: u64) -> RecordBatch {
        let mut records: Vec<EventRecord> = (0..size)
            .map(|i| EventRecord {
                event_time: current - Duration::seconds(i as i64),
                entity_id: self.rng.gen_range(1..1_000_000),
                chain_id: CHAIN_IDS[self.chains.sample(&mut self.rng)],
                block_number,
                contract_address: CONTRACT_POOL[self.rng.gen_range(0..CONTRACT_POOL.len())]
                    .to_string(),
                tx_hash: self.tx_hash(),
                value: self.values.sample(&mut self.rng),
                attribute: self.rng.gen::<f64>(),
                gas_used: f64::from(self.rng.gen_range(21_000u32..800_000)),
                calldata_size: self.rng.gen_range(64..4096),
            })
            .collect();

        self.inject_anomalies(&mut records);
        self.introduce_duplicates(&mut records);
        RecordBatch::new(records)
    }

    fn inject_anomalies(&mut self, records: &mut [EventRecord]) {
        if records.is_empty() {
            return;
        }
        let wanted = (records.len() as f64 * self.config.anomaly_ratio) as usize;
        let count = wanted.clamp(1, records.len());
        for idx in index::sample(&mut self.rng, records.len(), count) {
            let record = &mut records[idx];
            record.value *= self.rng.gen_range(2.0..5.0);
            record.gas_used *= f64::from(self.rng.gen_range(2u32..6));
            record.calldata_size *= self.rng.gen_range(2..5);
        }
    }

    fn introduce_duplicates(&mut self, records: &mut [EventRecord]) {
        if records.len() < 2 {
            return;
        }
        let count = (records.len() / 100).max(1);
        for idx in index::sample(&mut self.rng, records.len() - 1, count) {
            records[idx].tx_hash = records[idx + 1].tx_hash.clone();
        }
    }

    fn tx_hash(&mut self) -> String {
        let bytes: [u8; 32] = self.rng.gen();
        let mut hash = String::with_capacity(66);
        hash.push_str("0x");
        for byte in bytes {
            hash.push_str(&format!("{byte:02x}"));
        }
        hash
    }
}

impl BatchSource for SyntheticGenerator {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn batches(&mut self) -> Result<Vec<RecordBatch>> {
        let mut remaining = self.config.row_count;
        let mut current = self.start;
        let mut block_number = u64::try_from(self.start.timestamp()).unwrap_or(0);
        let mut batches = Vec::new();

        while remaining > 0 {
            let size = self.config.batch_size.min(remaining);
            batches.push(self.generate_batch(size, current, block_number));
            remaining -= size;
            current -= Duration::seconds(size as i64);
            block_number = block_number.saturating_sub(size as u64);
        }

        debug!(batches = batches.len(), rows = self.config.row_count, "synthetic batches generated");
        Ok(batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_batches_shape() {
        let config = SyntheticConfig::new(1000, 200, 0.1, 42);
        let mut generator = SyntheticGenerator::with_start(config, start()).unwrap();
        let batches = generator.batches().unwrap();

        assert_eq!(batches.len(), 5);
        assert_eq!(batches.iter().map(RecordBatch::len).sum::<usize>(), 1000);
    }

    #[test]
    fn test_last_batch_is_partial() {
        let config = SyntheticConfig::new(450, 200, 0.1, 7);
        let mut generator = SyntheticGenerator::with_start(config, start()).unwrap();
        let sizes: Vec<usize> = generator.batches().unwrap().iter().map(RecordBatch::len).collect();
        assert_eq!(sizes, vec![200, 200, 50]);
    }

    #[test]
    fn test_same_seed_same_rows() {
        let config = SyntheticConfig::new(300, 100, 0.05, 9);
        let a = SyntheticGenerator::with_start(config.clone(), start()).unwrap().batches().unwrap();
        let b = SyntheticGenerator::with_start(config, start()).unwrap().batches().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_timestamps_count_backwards_across_batches() {
        let config = SyntheticConfig::new(20, 10, 0.1, 3);
        let batches = SyntheticGenerator::with_start(config, start()).unwrap().batches().unwrap();
        let all = RecordBatch::concat(batches);
        let (window_start, window_end) = all.window_bounds().unwrap();
        assert_eq!(window_end, start());
        assert_eq!(window_start, start() - Duration::seconds(19));
    }

    #[test]
    fn test_value_domain() {
        let config = SyntheticConfig::new(500, 500, 0.02, 11);
        let batches = SyntheticGenerator::with_start(config, start()).unwrap().batches().unwrap();
        for record in &batches[0] {
            assert!(CHAIN_IDS.contains(&record.chain_id));
            assert!((0.0..1.0).contains(&record.attribute));
            assert!(record.calldata_size >= 64);
            assert_eq!(record.tx_hash.len(), 66);
        }
    }

    #[test]
    fn test_duplicate_hashes_are_injected() {
        let config = SyntheticConfig::new(400, 400, 0.0, 5);
        let batches = SyntheticGenerator::with_start(config, start()).unwrap().batches().unwrap();
        let hashes: std::collections::HashSet<&str> =
            batches[0].iter().map(|r| r.tx_hash.as_str()).collect();
        assert!(hashes.len() < 400);
    }

    #[test]
    fn test_rejects_zero_batch_size() {
        let config = SyntheticConfig::new(10, 0, 0.1, 1);
        assert!(SyntheticGenerator::with_start(config, start()).is_err());
    }
}
