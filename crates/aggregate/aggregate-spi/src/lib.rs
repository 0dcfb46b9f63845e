//! Aggregation Service Provider Interface
//!
//! Defines the aggregate output model and aggregation errors.

pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use error::{AggregateError, Result};
pub use model::{Aggregate, AggregateCollection};
