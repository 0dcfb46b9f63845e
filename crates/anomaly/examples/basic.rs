//! Basic example demonstrating the detector ensemble
//!
//! Run with: cargo run --example basic -p anomaly

use anomaly::{
    AlertDecision, AnomalyDetectionConfig, DetectorEnsemble, DetectorRegistry, EventRecord,
    RecordBatch,
};
use chrono::{Duration, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== anomaly Basic Example ===\n");

    // A quiet window with three spikes
    let now = Utc::now();
    let values = [
        10.0, 11.0, 10.5, 11.5, 10.2, 11.3, 10.8, 11.1, 10.6, 11.4, 10.3, 11.2, 10.9, 25.0, 10.7,
        11.3, -5.0, 11.1, 10.8, 30.0,
    ];
    let window: RecordBatch = values
        .iter()
        .enumerate()
        .map(|(i, &value)| EventRecord {
            event_time: now - Duration::seconds(i as i64),
            entity_id: i as u64,
            chain_id: 1,
            block_number: 1,
            contract_address: "0xA1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6e7f8a9b0".to_string(),
            tx_hash: format!("0x{i:064x}"),
            value,
            attribute: 0.5,
            gas_used: 21_000.0,
            calldata_size: 128,
        })
        .collect::<Vec<_>>()
        .into();

    let config = AnomalyDetectionConfig {
        zscore_threshold: 2.0,
        ..Default::default()
    };
    let mut ensemble = DetectorEnsemble::from_config(&DetectorRegistry::default(), &config)?;
    let report = ensemble.run(&window)?;

    for anomaly in &report.anomalies {
        println!(
            "   {:8} score={:.3} severity={:.3}",
            anomaly.detector, anomaly.score, anomaly.severity
        );
    }

    let decision = AlertDecision::evaluate(&report, 0.1);
    println!(
        "\nHighest severity {:.3} vs threshold {:.3}: alert={}",
        decision.highest_severity, decision.threshold, decision.fired
    );

    println!("\n=== Example Complete ===");
    Ok(())
}
