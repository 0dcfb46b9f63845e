//! Anomaly Detection Service Provider Interface
//!
//! Defines the detector capability contract, the report model and the
//! errors shared by every detector.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::AnomalyDetector;
pub use error::{AnomalyError, Result};
pub use model::{AnomalyReport, DetectorAnomaly, SEVERITY_FLOOR};
