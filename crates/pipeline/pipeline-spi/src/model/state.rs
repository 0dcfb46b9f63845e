//! Run state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stage reached by a pipeline run.
///
/// `Idle -> Loaded -> Aggregated -> Detected -> Alerted | Skipped -> Done`,
/// with `Failed` reachable from anywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    #[default]
    Idle,
    Loaded,
    Aggregated,
    Detected,
    Alerted,
    Skipped,
    Done,
    Failed,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loaded => "loaded",
            Self::Aggregated => "aggregated",
            Self::Detected => "detected",
            Self::Alerted => "alerted",
            Self::Skipped => "skipped",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// `Done` and `Failed` end a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether `next` is a legal successor of this state.
    pub fn can_transition_to(&self, next: PipelineState) -> bool {
        use PipelineState::*;
        match (self, next) {
            (Done | Failed, _) => false,
            (_, Failed) => true,
            (Idle, Loaded)
            | (Loaded, Aggregated)
            | (Aggregated, Detected)
            | (Detected, Alerted | Skipped)
            | (Alerted | Skipped, Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
