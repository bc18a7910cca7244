//! Status enums for executions and workers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of an execution tracked by the controller.
///
/// Transitions only advance forward:
/// `Pending -> Dispatched -> {Succeeded | Failed}`, with the extra
/// `Pending -> Failed` edge for a start that never found a worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionState {
    /// Execution created but not yet assigned to a worker.
    #[default]
    Pending,
    /// Sample forwarded to a worker, awaiting the outcome.
    Dispatched,
    /// Task completed successfully.
    Succeeded,
    /// Task failed or could not be dispatched.
    Failed,
}

impl ExecutionState {
    /// Returns true if the execution is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Dispatched => "DISPATCHED",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        };
        write!(f, "{s}")
    }
}

/// Status of a registered worker endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerStatus {
    /// Worker is idle and ready to accept a dispatch.
    #[default]
    Idle,
    /// Worker currently has an unresolved dispatch.
    Busy,
    /// Worker could not be reached; excluded from selection until it
    /// re-registers.
    Unreachable,
}

impl WorkerStatus {
    /// Returns true if the worker can be handed a new dispatch.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "IDLE",
            Self::Busy => "BUSY",
            Self::Unreachable => "UNREACHABLE",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!ExecutionState::Pending.is_terminal());
        assert!(!ExecutionState::Dispatched.is_terminal());
        assert!(ExecutionState::Succeeded.is_terminal());
        assert!(ExecutionState::Failed.is_terminal());
    }

    #[test]
    fn test_worker_availability() {
        assert!(WorkerStatus::Idle.is_available());
        assert!(!WorkerStatus::Busy.is_available());
        assert!(!WorkerStatus::Unreachable.is_available());
    }

    #[test]
    fn test_state_serde_format() {
        let json = serde_json::to_string(&ExecutionState::Dispatched).unwrap();
        assert_eq!(json, "\"DISPATCHED\"");
        let back: ExecutionState = serde_json::from_str("\"FAILED\"").unwrap();
        assert_eq!(back, ExecutionState::Failed);
    }
}
