//! Progress callbacks for hosts that display workflow status

use crate::state::{Phase, RoutingDecision, StepKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display status of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepStatus {
    /// Enabled, not started
    Waiting,
    /// In flight
    Running,
    /// Finished with content
    Done,
    /// Finished with an error
    Failed,
    /// Not enabled for this query
    Skipped,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Waiting => "WAIT",
            Self::Running => "RUNNING",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
        };
        f.write_str(label)
    }
}

/// Receives progress events from the engine
///
/// Callbacks run inline on the workflow task and must return quickly.
pub trait WorkflowObserver: Send + Sync {
    /// Entered `phase`
    fn on_phase(&self, _phase: Phase) {}

    /// Router produced `decision` (after the always-run policy was applied)
    fn on_decision(&self, _decision: &RoutingDecision) {}

    /// `kind` changed to `status`
    fn on_step(&self, _kind: StepKind, _status: StepStatus) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl WorkflowObserver for NoopObserver {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(StepStatus::Waiting.to_string(), "WAIT");
        assert_eq!(StepStatus::Skipped.to_string(), "SKIPPED");
    }
}
