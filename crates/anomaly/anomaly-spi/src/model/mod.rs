//! Data models for anomaly detection.
//!
//! This module contains the per-detector result and the window report.

mod anomaly_report;
mod detector_anomaly;

pub use anomaly_report::{AnomalyReport, SEVERITY_FLOOR};
pub use detector_anomaly::DetectorAnomaly;
