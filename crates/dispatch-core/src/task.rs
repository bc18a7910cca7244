//! The pluggable task execution contract.

use crate::sample::TaskSample;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Failure raised by a task implementation.
///
/// Workers convert this into a structured failure payload at the HTTP
/// boundary; it never crosses the wire as a fault.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TaskError(String);

impl TaskError {
    /// Create a new TaskError with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<serde_json::Error> for TaskError {
    fn from(err: serde_json::Error) -> Self {
        Self(err.to_string())
    }
}

/// A named, pluggable unit of execution logic, bound to a worker.
///
/// Implementations are resolved by name from the worker's task set at
/// startup; there is no dispatch by type hierarchy.
#[async_trait]
pub trait Task: Send + Sync {
    /// Execute the task against one sample.
    async fn run(&self, sample: TaskSample) -> Result<Value, TaskError>;
}
