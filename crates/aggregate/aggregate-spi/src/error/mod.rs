//! Error types for aggregation.
//!
//! This module contains error types and the Result alias.

mod aggregate_error;

pub use aggregate_error::{AggregateError, Result};
