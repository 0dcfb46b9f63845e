//! Aggregation Facade
//!
//! Single entry point to the aggregate model, window specs and the
//! `WindowAggregator`.

pub use aggregate_spi::*;

pub use aggregate_api::*;

pub use aggregate_core::*;
