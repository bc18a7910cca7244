//! Dispatch table - single source of truth for execution state.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use dispatch_core::{CoreError, Execution, SampleId, TaskSample, WorkerAddr};

/// In-memory table of executions keyed by sample id.
///
/// Every mutation runs under the write lock, so transitions on one id are
/// strictly ordered: at-most-one writer wins a transition and losers observe
/// [`CoreError::InvalidTransition`] (or [`CoreError::DuplicateId`] on create).
#[derive(Default)]
pub struct DispatchTable {
    executions: RwLock<HashMap<SampleId, Execution>>,
}

impl DispatchTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pending execution for the sample.
    pub async fn create(
        &self,
        sample: &TaskSample,
        task_name: &str,
    ) -> Result<Execution, CoreError> {
        let mut executions = self.executions.write().await;
        if executions.contains_key(&sample.id) {
            return Err(CoreError::DuplicateId(sample.id.clone()));
        }
        let execution = Execution::new(sample.id.clone(), task_name);
        executions.insert(sample.id.clone(), execution.clone());
        Ok(execution)
    }

    /// Transition `Pending -> Dispatched`, recording the assigned worker.
    pub async fn mark_dispatched(
        &self,
        id: &SampleId,
        worker: WorkerAddr,
    ) -> Result<(), CoreError> {
        let mut executions = self.executions.write().await;
        executions
            .get_mut(id)
            .ok_or_else(|| CoreError::NotFound(id.clone()))?
            .mark_dispatched(worker)
    }

    /// Transition `Dispatched -> Succeeded`, recording the task output.
    pub async fn complete(&self, id: &SampleId, result: serde_json::Value) -> Result<(), CoreError> {
        let mut executions = self.executions.write().await;
        executions
            .get_mut(id)
            .ok_or_else(|| CoreError::NotFound(id.clone()))?
            .complete(result)
    }

    /// Transition `Pending|Dispatched -> Failed`, recording the failure.
    pub async fn fail(&self, id: &SampleId, error: impl Into<String>) -> Result<(), CoreError> {
        let mut executions = self.executions.write().await;
        executions
            .get_mut(id)
            .ok_or_else(|| CoreError::NotFound(id.clone()))?
            .fail(error)
    }

    /// Look up an execution by id.
    pub async fn get(&self, id: &SampleId) -> Result<Execution, CoreError> {
        let executions = self.executions.read().await;
        executions
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(id.clone()))
    }

    /// Number of tracked executions.
    pub async fn len(&self) -> usize {
        self.executions.read().await.len()
    }

    /// Returns true if no executions are tracked.
    pub async fn is_empty(&self) -> bool {
        self.executions.read().await.is_empty()
    }

    /// Drop terminal executions that finished more than `max_age` ago.
    ///
    /// Returns the number of executions removed. In-flight executions are
    /// never touched.
    pub async fn purge_terminal(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut executions = self.executions.write().await;
        let before = executions.len();
        executions.retain(|_, execution| {
            !(execution.is_terminal()
                && execution.finished_at.is_some_and(|finished| finished < cutoff))
        });
        let removed = before - executions.len();
        if removed > 0 {
            debug!(removed, "purged terminal executions");
        }
        removed
    }
}
