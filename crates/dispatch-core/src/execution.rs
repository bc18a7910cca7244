//! The tracked record of one task-start request.

use crate::error::CoreError;
use crate::ids::{SampleId, WorkerAddr};
use crate::status::ExecutionState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Record of one task-start request from creation to terminal outcome.
///
/// Keyed by the originating sample's id. The mutators enforce the forward-only
/// transition invariant; callers that lose a transition race observe
/// [`CoreError::InvalidTransition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    /// Unique execution identifier (the sample id).
    pub id: SampleId,

    /// Name of the task to execute.
    pub task_name: String,

    /// Worker assigned to this execution, once dispatched.
    pub worker: Option<WorkerAddr>,

    /// Current execution state.
    pub state: ExecutionState,

    /// Task output if the execution succeeded.
    pub result: Option<Value>,

    /// Failure description if the execution failed.
    pub error: Option<String>,

    /// When the execution was created.
    pub created_at: DateTime<Utc>,

    /// When the sample was dispatched to a worker.
    pub started_at: Option<DateTime<Utc>>,

    /// When the execution reached a terminal state.
    pub finished_at: Option<DateTime<Utc>>,
}

impl Execution {
    /// Create a new pending execution.
    pub fn new(id: SampleId, task_name: impl Into<String>) -> Self {
        Self {
            id,
            task_name: task_name.into(),
            worker: None,
            state: ExecutionState::Pending,
            result: None,
            error: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Transition `Pending -> Dispatched`, recording the assigned worker.
    pub fn mark_dispatched(&mut self, worker: WorkerAddr) -> Result<(), CoreError> {
        if self.state != ExecutionState::Pending {
            return Err(self.invalid_transition(ExecutionState::Dispatched));
        }
        self.state = ExecutionState::Dispatched;
        self.worker = Some(worker);
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// Transition `Dispatched -> Succeeded`, recording the task output.
    pub fn complete(&mut self, result: Value) -> Result<(), CoreError> {
        if self.state != ExecutionState::Dispatched {
            return Err(self.invalid_transition(ExecutionState::Succeeded));
        }
        self.state = ExecutionState::Succeeded;
        self.result = Some(result);
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Transition `Pending|Dispatched -> Failed`, recording the failure.
    ///
    /// A pending execution may fail directly when worker selection comes up
    /// empty, so a start request never leaves a non-terminal orphan behind.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), CoreError> {
        if self.state.is_terminal() {
            return Err(self.invalid_transition(ExecutionState::Failed));
        }
        self.state = ExecutionState::Failed;
        self.error = Some(error.into());
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Check if the execution is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    fn invalid_transition(&self, to: ExecutionState) -> CoreError {
        CoreError::InvalidTransition {
            from: self.state,
            to,
        }
    }
}
