//! Aggregation API
//!
//! Trailing-window duration specs and feature configuration.

mod window_spec;

use serde::{Deserialize, Serialize};

// Re-export SPI types
pub use aggregate_spi::{Aggregate, AggregateCollection, AggregateError, Result};

pub use window_spec::WindowSpec;

/// Feature configuration for the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Trailing-window durations such as `"5m"` or `"1h"`, in output order.
    #[serde(default)]
    pub windows: Vec<String>,
}

impl FeatureConfig {
    pub fn new<I, S>(windows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            windows: windows.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse every configured window, failing on the first bad one.
    pub fn parse_windows(&self) -> Result<Vec<WindowSpec>> {
        self.windows.iter().map(|w| w.parse()).collect()
    }
}
