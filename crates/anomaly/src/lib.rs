//! # anomaly
//!
//! Anomaly detection for event windows: a detector contract, built-in
//! detectors, an ensemble runner and the alert rule.

pub use anomaly_facade::*;
pub use batch_spi::{EventRecord, RecordBatch};
