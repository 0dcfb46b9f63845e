//! Pipeline error types.

use aggregate_spi::AggregateError;
use anomaly_spi::AnomalyError;
use batch_spi::BatchError;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Anomaly(#[from] AnomalyError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Empty window: no events since {since}")]
    EmptyWindow { since: DateTime<Utc> },

    #[error("Alert delivery via {sink} failed: {reason}")]
    AlertDelivery { sink: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn delivery(sink: impl Into<String>, reason: impl ToString) -> Self {
        Self::AlertDelivery {
            sink: sink.into(),
            reason: reason.to_string(),
        }
    }

    /// True when the run had no rows to work on, whichever stage noticed.
    pub fn is_empty_window(&self) -> bool {
        matches!(
            self,
            Self::EmptyWindow { .. }
                | Self::Aggregate(AggregateError::EmptyWindow)
                | Self::Anomaly(AnomalyError::EmptyWindow)
        )
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
