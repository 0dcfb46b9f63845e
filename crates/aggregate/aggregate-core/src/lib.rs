//! Aggregation Core
//!
//! Window aggregation and the descriptive statistics behind it.

mod aggregator;
pub mod stats;

pub use aggregator::WindowAggregator;
