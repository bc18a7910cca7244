//! JSON wire contract between client, controller and workers.

use crate::ids::{SampleId, WorkerAddr};
use crate::sample::TaskSample;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tagged outcome of a boundary call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

/// Request body for `POST /start` on the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRequest {
    /// Name of the task to run.
    pub task_name: String,

    /// Sample id; generated by the controller when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SampleId>,

    /// Sample payload.
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl StartRequest {
    /// Create a new StartRequest.
    pub fn new(task_name: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            task_name: task_name.into(),
            id: None,
            data,
        }
    }

    /// Builder method to set a specific sample id.
    pub fn with_id(mut self, id: SampleId) -> Self {
        self.id = Some(id);
        self
    }

    /// Convert into a sample, generating an id when none was supplied.
    pub fn into_sample(self) -> TaskSample {
        TaskSample {
            id: self.id.unwrap_or_else(SampleId::generate),
            data: self.data,
        }
    }
}

/// Response body for `POST /start` on the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartResponse {
    pub status: Outcome,

    /// Task output when the execution succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Failure description when the execution failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Id under which the execution is tracked.
    pub execution_id: SampleId,
}

impl StartResponse {
    /// Build a success outcome.
    pub fn success(execution_id: SampleId, result: Value) -> Self {
        Self {
            status: Outcome::Success,
            result: Some(result),
            error: None,
            execution_id,
        }
    }

    /// Build a failure outcome.
    pub fn failure(execution_id: SampleId, error: impl Into<String>) -> Self {
        Self {
            status: Outcome::Failure,
            result: None,
            error: Some(error.into()),
            execution_id,
        }
    }
}

/// Request body for `POST /run` on a worker.
///
/// `task_name` is optional: a worker hosting exactly one task accepts a bare
/// sample, a worker hosting several requires the name. The controller always
/// sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    /// Sample id; generated when absent.
    #[serde(default = "SampleId::generate")]
    pub id: SampleId,

    /// Task to resolve in the worker's task set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,

    /// Sample payload.
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl RunRequest {
    /// Build a run request for a named task from a sample.
    pub fn new(task_name: impl Into<String>, sample: TaskSample) -> Self {
        Self {
            id: sample.id,
            task_name: Some(task_name.into()),
            data: sample.data,
        }
    }

    /// Convert into the sample to hand to the task.
    pub fn into_sample(self) -> TaskSample {
        TaskSample {
            id: self.id,
            data: self.data,
        }
    }
}

/// Response body for `POST /run` on a worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResponse {
    pub status: Outcome,

    /// Task output on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Failure description on task failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RunResponse {
    /// Build a success outcome.
    pub fn success(result: Value) -> Self {
        Self {
            status: Outcome::Success,
            result: Some(result),
            detail: None,
        }
    }

    /// Build a failure outcome.
    pub fn failure(detail: impl Into<String>) -> Self {
        Self {
            status: Outcome::Failure,
            result: None,
            detail: Some(detail.into()),
        }
    }
}

/// Request body for `POST /workers/register` on the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Base URL the controller should dispatch to.
    pub addr: WorkerAddr,

    /// Task names this worker can execute.
    pub capabilities: Vec<String>,
}
