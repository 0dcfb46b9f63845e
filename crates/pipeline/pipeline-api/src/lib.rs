//! Pipeline API
//!
//! The YAML configuration document and its validation rules.

mod storage;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// Re-export SPI types
pub use pipeline_spi::{
    AlertSink, Loader, PipelineError, PipelineOutcome, PipelineState, Result, Storage,
};

pub use aggregate_api::FeatureConfig;
pub use anomaly_api::{AlertingConfig, AnomalyDetectionConfig, SinkKind};
pub use batch_api::{FileSourceConfig, QualityConfig, SourceConfig, SourceKind, SyntheticConfig};
pub use storage::{StorageConfig, WindowAnchor};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PIPELINE_CONFIG";

/// Config file used when neither a flag nor the environment names one.
pub const DEFAULT_CONFIG_PATH: &str = "config/pipeline.yaml";

/// Complete pipeline configuration.
///
/// # Example
///
/// ```rust,ignore
/// let config = PipelineConfig::load("config/pipeline.yaml")?;
/// config.validate()?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub dataset: SyntheticConfig,
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub quality: QualityConfig,
    #[serde(default)]
    pub anomaly_detection: AnomalyDetectionConfig,
    #[serde(default)]
    pub alerting: AlertingConfig,
}

impl PipelineConfig {
    /// Read and parse a YAML file. Does not validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
            .map_err(|e| PipelineError::config(format!("{}: {e}", path.display())))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| PipelineError::config(e.to_string()))
    }

    /// Config path from an explicit value, then `PIPELINE_CONFIG`, then the default.
    pub fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Check every section, failing on the first problem.
    pub fn validate(&self) -> Result<()> {
        self.storage.validate()?;
        self.source.validate()?;
        self.dataset.validate()?;
        self.features.parse_windows()?;
        self.anomaly_detection.validate()?;
        self.alerting.validate()?;
        Ok(())
    }

    /// Parse and validate in one step.
    pub fn load_validated(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }
}
