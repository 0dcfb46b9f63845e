//! Anomaly Detection API
//!
//! Configuration types for detectors, the ensemble and alerting.

use serde::{Deserialize, Serialize};

// Re-export SPI types
pub use anomaly_spi::{
    AnomalyDetector, AnomalyError, AnomalyReport, DetectorAnomaly, Result, SEVERITY_FLOOR,
};

/// Built-in detector names.
pub const ZSCORE: &str = "zscore";
pub const IQR: &str = "iqr";
pub const DBSCAN: &str = "dbscan";
pub const ISOLATION_FOREST: &str = "isolation_forest";
pub const HDBSCAN: &str = "hdbscan";

fn invalid(name: &str, reason: &str) -> AnomalyError {
    AnomalyError::invalid(name, reason)
}

// ============================================================================
// Detector Configuration
// ============================================================================

/// Z-Score detector configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZScoreConfig {
    /// Z-score threshold for anomaly detection (default: 3.0).
    pub threshold: f64,
}

impl Default for ZScoreConfig {
    fn default() -> Self {
        Self { threshold: 3.0 }
    }
}

impl ZScoreConfig {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(invalid("zscore_threshold", "must be positive and finite"));
        }
        Ok(())
    }
}

/// IQR detector configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IqrConfig {
    /// IQR multiplier for outlier bounds (default: 1.5).
    pub multiplier: f64,
}

impl Default for IqrConfig {
    fn default() -> Self {
        Self { multiplier: 1.5 }
    }
}

impl IqrConfig {
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.multiplier.is_finite() && self.multiplier > 0.0) {
            return Err(invalid("iqr.multiplier", "must be positive and finite"));
        }
        Ok(())
    }
}

/// DBSCAN detector configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbscanConfig {
    /// Neighbourhood radius in standardised feature space.
    pub eps: f64,
    /// Neighbours (including the point itself) needed for a core point.
    pub min_samples: usize,
}

impl Default for DbscanConfig {
    fn default() -> Self {
        Self {
            eps: 0.5,
            min_samples: 5,
        }
    }
}

impl DbscanConfig {
    pub fn new(eps: f64, min_samples: usize) -> Self {
        Self { eps, min_samples }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.eps.is_finite() && self.eps > 0.0) {
            return Err(invalid("dbscan.eps", "must be positive and finite"));
        }
        if self.min_samples == 0 {
            return Err(invalid("dbscan.min_samples", "must be at least 1"));
        }
        Ok(())
    }
}

/// Isolation forest parameters, handed to a registered constructor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsolationForestConfig {
    /// Expected share of outliers, in (0, 0.5].
    pub contamination: f64,
    pub random_state: u64,
}

impl Default for IsolationForestConfig {
    fn default() -> Self {
        Self {
            contamination: 0.05,
            random_state: 42,
        }
    }
}

impl IsolationForestConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(invalid(
                "isolation_forest.contamination",
                "must be in range (0, 0.5]",
            ));
        }
        Ok(())
    }
}

/// HDBSCAN parameters, handed to a registered constructor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HdbscanConfig {
    pub enabled: bool,
    pub min_cluster_size: usize,
    pub min_samples: usize,
}

impl Default for HdbscanConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_cluster_size: 15,
            min_samples: 5,
        }
    }
}

impl HdbscanConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_cluster_size < 2 {
            return Err(invalid("hdbscan.min_cluster_size", "must be at least 2"));
        }
        if self.min_samples == 0 {
            return Err(invalid("hdbscan.min_samples", "must be at least 1"));
        }
        Ok(())
    }
}

// ============================================================================
// Ensemble Configuration
// ============================================================================

fn default_detectors() -> Vec<String> {
    vec![ZSCORE.to_string(), IQR.to_string(), DBSCAN.to_string()]
}

fn default_zscore_threshold() -> f64 {
    ZScoreConfig::default().threshold
}

/// Detector selection and parameters for one ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyDetectionConfig {
    /// Detector names in evaluation order.
    #[serde(default = "default_detectors")]
    pub detectors: Vec<String>,
    #[serde(default = "default_zscore_threshold")]
    pub zscore_threshold: f64,
    #[serde(default)]
    pub iqr: IqrConfig,
    #[serde(default)]
    pub dbscan: DbscanConfig,
    #[serde(default)]
    pub isolation_forest: IsolationForestConfig,
    #[serde(default)]
    pub hdbscan: HdbscanConfig,
    /// Evaluate detectors on the rayon pool.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for AnomalyDetectionConfig {
    fn default() -> Self {
        Self {
            detectors: default_detectors(),
            zscore_threshold: default_zscore_threshold(),
            iqr: IqrConfig::default(),
            dbscan: DbscanConfig::default(),
            isolation_forest: IsolationForestConfig::default(),
            hdbscan: HdbscanConfig::default(),
            parallel: false,
        }
    }
}

impl AnomalyDetectionConfig {
    pub fn zscore(&self) -> ZScoreConfig {
        ZScoreConfig::new(self.zscore_threshold)
    }

    /// Detector names to build, with `hdbscan` appended when enabled.
    pub fn detector_order(&self) -> Vec<String> {
        let mut order = self.detectors.clone();
        if self.hdbscan.enabled && !order.iter().any(|d| d == HDBSCAN) {
            order.push(HDBSCAN.to_string());
        }
        order
    }

    pub fn validate(&self) -> Result<()> {
        self.zscore().validate()?;
        self.iqr.validate()?;
        self.dbscan.validate()?;
        self.isolation_forest.validate()?;
        if self.hdbscan.enabled {
            self.hdbscan.validate()?;
        }
        let order = self.detector_order();
        for (i, name) in order.iter().enumerate() {
            if order[..i].contains(name) {
                return Err(AnomalyError::DuplicateDetector(name.clone()));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Alerting Configuration
// ============================================================================

/// Alert delivery transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    #[default]
    Stdout,
    /// JSON webhook.
    Http,
    /// Slack incoming webhook.
    Slack,
}

fn default_threshold_score() -> f64 {
    0.8
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_enabled() -> bool {
    true
}

/// When and where to send alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertingConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Alert fires when the highest severity reaches this value.
    #[serde(default = "default_threshold_score")]
    pub threshold_score: f64,
    #[serde(default)]
    pub sink: SinkKind,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AlertingConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            threshold_score: default_threshold_score(),
            sink: SinkKind::default(),
            webhook_url: None,
            channel: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AlertingConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.threshold_score.is_finite() {
            return Err(invalid("alerting.threshold_score", "must be finite"));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("alerting.timeout_secs", "must be positive"));
        }
        let has_url = self
            .webhook_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());
        if matches!(self.sink, SinkKind::Http | SinkKind::Slack) && !has_url {
            return Err(invalid(
                "alerting.webhook_url",
                "required for http and slack sinks",
            ));
        }
        Ok(())
    }
}
