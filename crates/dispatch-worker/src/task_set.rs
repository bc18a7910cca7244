//! Task registry resolved at worker startup.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use dispatch_core::Task;

/// Errors resolving a task in the set.
#[derive(Debug, Error)]
pub enum TaskSetError {
    /// No task registered under the requested name.
    #[error("unknown task: {0}")]
    UnknownTask(String),

    /// The request named no task and the set holds more than one.
    #[error("task_name required: this worker hosts {0} tasks")]
    NameRequired(usize),
}

/// Mapping from task name to implementation, built once at startup.
///
/// Each name resolves to exactly one implementation. A request that names no
/// task resolves only when the set holds a single task, which preserves the
/// bare-sample wire contract of single-task workers.
#[derive(Default)]
pub struct TaskSet {
    tasks: HashMap<String, Arc<dyn Task>>,
}

impl TaskSet {
    /// Create an empty task set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to register a task under a name.
    ///
    /// Registering the same name twice replaces the implementation.
    pub fn with_task(mut self, name: impl Into<String>, task: Arc<dyn Task>) -> Self {
        self.tasks.insert(name.into(), task);
        self
    }

    /// Resolve a task by (optional) name.
    pub fn resolve(&self, name: Option<&str>) -> Result<Arc<dyn Task>, TaskSetError> {
        match name {
            Some(name) => self
                .tasks
                .get(name)
                .cloned()
                .ok_or_else(|| TaskSetError::UnknownTask(name.to_owned())),
            None => match self.tasks.values().next() {
                Some(task) if self.tasks.len() == 1 => Ok(task.clone()),
                _ => Err(TaskSetError::NameRequired(self.tasks.len())),
            },
        }
    }

    /// Names of all registered tasks, sorted; this is the capability set
    /// advertised to the controller.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tasks.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if no tasks are registered.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
