//! Anomaly detection error types.

use thiserror::Error;

/// Anomaly detection errors.
#[derive(Debug, Error)]
pub enum AnomalyError {
    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Detection error: {0}")]
    DetectionError(String),

    #[error("Empty window: no rows to score")]
    EmptyWindow,

    #[error("Duplicate detector: {0}")]
    DuplicateDetector(String),

    #[error("Unknown detector: {0}")]
    UnknownDetector(String),

    #[error("Detector {detector} returned {got} scores for {expected} rows")]
    ScoreCountMismatch {
        detector: String,
        expected: usize,
        got: usize,
    },

    #[error("Detector {detector} failed: {source}")]
    DetectorFailure {
        detector: String,
        #[source]
        source: Box<AnomalyError>,
    },

    #[error("Detector {detector} returned non-finite severity {severity}")]
    NonFiniteSeverity { detector: String, severity: f64 },

    #[error("Detector {detector} produced non-finite score {score}")]
    NonFiniteScore { detector: String, score: f64 },
}

impl AnomalyError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Attach a detector name to an error raised inside that detector.
    pub fn in_detector(detector: impl Into<String>, source: AnomalyError) -> Self {
        Self::DetectorFailure {
            detector: detector.into(),
            source: Box::new(source),
        }
    }

    /// True for every failure attributed to a single detector.
    pub fn is_detector_failure(&self) -> bool {
        matches!(
            self,
            Self::DetectorFailure { .. }
                | Self::NonFiniteSeverity { .. }
                | Self::NonFiniteScore { .. }
                | Self::ScoreCountMismatch { .. }
        )
    }

    /// Name of the offending detector, if the error carries one.
    pub fn detector(&self) -> Option<&str> {
        match self {
            Self::DetectorFailure { detector, .. }
            | Self::NonFiniteSeverity { detector, .. }
            | Self::NonFiniteScore { detector, .. }
            | Self::ScoreCountMismatch { detector, .. } => Some(detector.as_str()),
            Self::DuplicateDetector(name) | Self::UnknownDetector(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

/// Result type for anomaly detection operations.
pub type Result<T> = std::result::Result<T, AnomalyError>;
