//! Record batch error types.

use thiserror::Error;

/// Errors raised by batch sources and quality checks.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Quality checks removed all {removed} rows from batch")]
    EmptyAfterQuality { removed: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for batch operations.
pub type Result<T> = std::result::Result<T, BatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_column_display() {
        let error = BatchError::UnknownColumn("price".to_string());
        assert_eq!(error.to_string(), "Unknown column: price");
    }

    #[test]
    fn test_parse_display() {
        let error = BatchError::Parse {
            line: 7,
            reason: "expected value".to_string(),
        };
        assert_eq!(error.to_string(), "Parse error at line 7: expected value");
    }

    #[test]
    fn test_invalid_parameter_display() {
        let error = BatchError::InvalidParameter {
            name: "batch_size".to_string(),
            reason: "must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid parameter: batch_size - must be positive"
        );
    }

    #[test]
    fn test_empty_after_quality_display() {
        let error = BatchError::EmptyAfterQuality { removed: 3 };
        assert_eq!(
            error.to_string(),
            "Quality checks removed all 3 rows from batch"
        );
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: BatchError = io.into();
        assert!(matches!(error, BatchError::Io(_)));
        assert!(error.to_string().starts_with("I/O error"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BatchError>();
    }
}
