//! Aggregation error types.

use thiserror::Error;

/// Aggregation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    /// A trailing-window duration could not be parsed. Aborts the whole
    /// aggregation.
    #[error("Invalid window spec '{spec}': {reason}")]
    InvalidWindowSpec { spec: String, reason: String },

    #[error("Cannot aggregate an empty window")]
    EmptyWindow,

    #[error("Duplicate metric in collection: {0}")]
    DuplicateMetric(String),

    #[error("Metric '{metric}' has window_start after window_end")]
    InvertedWindow { metric: String },
}

/// Result type for aggregation operations.
pub type Result<T> = std::result::Result<T, AggregateError>;
