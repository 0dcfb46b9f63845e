//! Record Batch API
//!
//! Configuration types for batch sources and quality filtering.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// Re-export SPI types
pub use batch_spi::{
    BatchError, BatchSource, Column, EventRecord, QualityChecker, RecordBatch, Result,
    HIGH_CALLDATA_THRESHOLD,
};

// ============================================================================
// Source Configuration
// ============================================================================

/// Which source feeds the loader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Synthetic,
    /// Newline-delimited JSON replay file.
    File,
}

/// Synthetic dataset configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticConfig {
    /// Total rows to generate.
    pub row_count: usize,
    /// Rows per emitted batch.
    pub batch_size: usize,
    /// Share of rows receiving an injected spike.
    pub anomaly_ratio: f64,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            row_count: 10_000,
            batch_size: 2_000,
            anomaly_ratio: 0.02,
            seed: 42,
        }
    }
}

impl SyntheticConfig {
    pub fn new(row_count: usize, batch_size: usize, anomaly_ratio: f64, seed: u64) -> Self {
        Self {
            row_count,
            batch_size,
            anomaly_ratio,
            seed,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(invalid("batch_size", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.anomaly_ratio) {
            return Err(invalid("anomaly_ratio", "must be in range [0, 1]"));
        }
        Ok(())
    }
}

/// Replay file configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSourceConfig {
    pub path: PathBuf,
    #[serde(default = "default_file_batch_size")]
    pub batch_size: usize,
}

fn default_file_batch_size() -> usize {
    500
}

impl FileSourceConfig {
    pub fn new(path: impl Into<PathBuf>, batch_size: usize) -> Self {
        Self {
            path: path.into(),
            batch_size,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(invalid("batch_size", "must be positive"));
        }
        Ok(())
    }
}

/// Source selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(rename = "type", default)]
    pub kind: SourceKind,
    #[serde(default)]
    pub file: Option<FileSourceConfig>,
}

impl SourceConfig {
    pub fn validate(&self) -> Result<()> {
        match (self.kind, &self.file) {
            (SourceKind::File, None) => Err(invalid(
                "source.file",
                "file source requested but file config missing",
            )),
            (_, Some(file)) => file.validate(),
            (SourceKind::Synthetic, None) => Ok(()),
        }
    }
}

// ============================================================================
// Quality Configuration
// ============================================================================

/// Row-level quality filter configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Columns whose tuple identifies a duplicate row.
    #[serde(default)]
    pub dedup_keys: Vec<Column>,
    /// Columns that must hold a value.
    #[serde(default)]
    pub required_columns: Vec<Column>,
}

impl QualityConfig {
    pub fn new(dedup_keys: Vec<Column>, required_columns: Vec<Column>) -> Self {
        Self {
            dedup_keys,
            required_columns,
        }
    }

    /// True when no check is configured.
    pub fn is_noop(&self) -> bool {
        self.dedup_keys.is_empty() && self.required_columns.is_empty()
    }
}

fn invalid(name: &str, reason: &str) -> BatchError {
    BatchError::InvalidParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
