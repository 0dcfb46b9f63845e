//! Storage configuration.

use aggregate_api::WindowSpec;
use chrono::Duration;
use serde::{Deserialize, Serialize};

use pipeline_spi::Result;

/// Which instant the latest window ends at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowAnchor {
    /// Current wall-clock time.
    #[default]
    WallClock,
    /// Newest stored `event_time`.
    LatestEvent,
}

fn default_lookback() -> String {
    "1d".to_string()
}

/// Windowed-read settings for the event store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// How far back from the anchor the latest window reaches.
    #[serde(default = "default_lookback")]
    pub lookback: String,
    #[serde(default)]
    pub anchor: WindowAnchor,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            lookback: default_lookback(),
            anchor: WindowAnchor::default(),
        }
    }
}

impl StorageConfig {
    pub fn lookback_duration(&self) -> Result<Duration> {
        let spec: WindowSpec = self.lookback.parse()?;
        Ok(spec.duration())
    }

    pub fn validate(&self) -> Result<()> {
        self.lookback_duration().map(|_| ())
    }
}
