//! Data models for aggregation output.

mod aggregate;
mod collection;

pub use aggregate::Aggregate;
pub use collection::AggregateCollection;
