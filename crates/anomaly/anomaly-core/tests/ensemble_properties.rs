//! Property tests for the ensemble and the alert rule.

use anomaly_core::{is_alert, DetectorEnsemble};
use anomaly_spi::{AnomalyDetector, AnomalyReport, DetectorAnomaly, Result};
use batch_spi::{EventRecord, RecordBatch};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

/// Sleeps before answering so parallel completion order is scrambled.
struct Delayed {
    name: String,
    delay_ms: u64,
    severity: f64,
}

impl AnomalyDetector for Delayed {
    fn name(&self) -> &str {
        &self.name
    }

    fn fit_predict(&mut self, batch: &RecordBatch) -> Result<Vec<f64>> {
        std::thread::sleep(std::time::Duration::from_millis(self.delay_ms));
        Ok(vec![self.severity; batch.len()])
    }

    fn severity(&self, _scores: &[f64]) -> Result<f64> {
        Ok(self.severity)
    }
}

fn batch(rows: usize) -> RecordBatch {
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..rows)
        .map(|i| EventRecord {
            event_time: t0 + Duration::seconds(i as i64),
            entity_id: i as u64,
            chain_id: 1,
            block_number: 1,
            contract_address: "0xa".to_string(),
            tx_hash: format!("0x{i}"),
            value: 100.0,
            attribute: 0.5,
            gas_used: 21_000.0,
            calldata_size: 64,
        })
        .collect::<Vec<_>>()
        .into()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn output_keeps_configuration_order(
        delays in prop::collection::vec(0u64..4, 1..6),
        parallel in any::<bool>(),
    ) {
        let detectors: Vec<Box<dyn AnomalyDetector>> = delays
            .iter()
            .enumerate()
            .map(|(i, &delay_ms)| {
                Box::new(Delayed {
                    name: format!("det{i}"),
                    delay_ms,
                    severity: i as f64 / 10.0,
                }) as Box<dyn AnomalyDetector>
            })
            .collect();
        let expected: Vec<String> = (0..delays.len()).map(|i| format!("det{i}")).collect();

        let mut ensemble = DetectorEnsemble::new(detectors).unwrap().parallel(parallel);
        let report = ensemble.run(&batch(3)).unwrap();
        let names: Vec<String> = report.detectors().into_iter().map(String::from).collect();
        prop_assert_eq!(names, expected);
    }

    #[test]
    fn alert_iff_highest_severity_reaches_threshold(
        severities in prop::collection::vec(-5.0f64..5.0, 0..8),
        threshold in -5.0f64..5.0,
    ) {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let anomalies = severities
            .iter()
            .enumerate()
            .map(|(i, &s)| DetectorAnomaly::new(format!("det{i}"), 0.0, s))
            .collect();
        let report = AnomalyReport::new(t0, t0, t0, anomalies).unwrap();
        let highest = severities.iter().copied().fold(None, |m: Option<f64>, s| {
            Some(m.map_or(s, |m| m.max(s)))
        }).unwrap_or(0.0);
        prop_assert_eq!(is_alert(&report, threshold), highest >= threshold);
    }
}
