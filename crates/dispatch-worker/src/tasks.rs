//! Built-in task implementations.

use async_trait::async_trait;
use serde_json::Value;

use dispatch_core::{Task, TaskError, TaskSample};

/// Task that returns the sample's data verbatim.
pub struct EchoTask;

#[async_trait]
impl Task for EchoTask {
    async fn run(&self, sample: TaskSample) -> Result<Value, TaskError> {
        Ok(Value::Object(sample.data))
    }
}
