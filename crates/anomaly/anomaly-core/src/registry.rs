//! Name-to-constructor registry for detectors.

use std::collections::BTreeMap;
use std::fmt;

use anomaly_api::{AnomalyDetectionConfig, DBSCAN, IQR, ZSCORE};
use anomaly_spi::{AnomalyDetector, AnomalyError, Result};

use crate::detectors::{DbscanDetector, IqrDetector, ZScoreDetector};

/// Builds one detector from the detection configuration.
pub type DetectorConstructor =
    Box<dyn Fn(&AnomalyDetectionConfig) -> Result<Box<dyn AnomalyDetector>> + Send + Sync>;

/// Resolves configured detector names to instances.
///
/// `with_builtins` knows `zscore`, `iqr` and `dbscan`. Other detectors,
/// such as an isolation forest, are plugged in with [`register`].
///
/// [`register`]: DetectorRegistry::register
pub struct DetectorRegistry {
    constructors: BTreeMap<String, DetectorConstructor>,
}

impl DetectorRegistry {
    /// Registry with no detectors.
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry
            .register(ZSCORE, |config| {
                Ok(Box::new(ZScoreDetector::from_config(config.zscore())) as Box<dyn AnomalyDetector>)
            })
            .register(IQR, |config| {
                Ok(Box::new(IqrDetector::from_config(config.iqr)) as Box<dyn AnomalyDetector>)
            })
            .register(DBSCAN, |config| {
                Ok(Box::new(DbscanDetector::from_config(config.dbscan)) as Box<dyn AnomalyDetector>)
            });
        registry
    }

    /// Add or replace the constructor for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(&AnomalyDetectionConfig) -> Result<Box<dyn AnomalyDetector>> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Box::new(constructor));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    pub fn build(&self, name: &str, config: &AnomalyDetectionConfig) -> Result<Box<dyn AnomalyDetector>> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| AnomalyError::UnknownDetector(name.to_string()))?;
        constructor(config)
    }

    /// Build every detector in `config.detector_order()`.
    pub fn build_all(&self, config: &AnomalyDetectionConfig) -> Result<Vec<Box<dyn AnomalyDetector>>> {
        config
            .detector_order()
            .iter()
            .map(|name| self.build(name, config))
            .collect()
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for DetectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectorRegistry")
            .field("detectors", &self.names())
            .finish()
    }
}
