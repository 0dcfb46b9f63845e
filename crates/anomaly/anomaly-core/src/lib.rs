//! Anomaly Detection Core
//!
//! Built-in detectors, the detector registry, the ensemble runner and the
//! alert decision rule.

mod alerting;
mod detectors;
mod ensemble;
mod registry;

pub use alerting::*;
pub use detectors::*;
pub use ensemble::*;
pub use registry::*;
