//! Controller - orchestrates one task-start request end-to-end.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use dispatch_core::{
    CoreError, Execution, Outcome, RunRequest, RunResponse, SampleId, StartResponse, TaskSample,
};

use crate::state::AppState;

/// Timeout for one controller-to-worker exchange. Covers the worker's task
/// execution, so it is deliberately generous.
const FORWARD_TIMEOUT: Duration = Duration::from_secs(300);

/// Orchestrates start requests: validates, records the execution, selects a
/// worker, forwards the sample and resolves the outcome.
pub struct Controller {
    /// Dispatch table and worker registry.
    pub state: Arc<AppState>,

    http: reqwest::Client,
}

impl Controller {
    /// Create a new Controller over shared state.
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            http: reqwest::Client::new(),
        }
    }

    /// Run one task-start request end-to-end.
    ///
    /// Returns `Ok` with a structured success or failure outcome for every
    /// dispatch that was accepted; `Err` only for malformed input, a reused
    /// sample id, or an internal consistency violation.
    pub async fn start(
        &self,
        task_name: &str,
        sample: TaskSample,
    ) -> Result<StartResponse, CoreError> {
        if task_name.trim().is_empty() {
            return Err(CoreError::Validation("task_name must not be empty".into()));
        }
        if sample.id.as_str().trim().is_empty() {
            return Err(CoreError::Validation("sample id must not be empty".into()));
        }

        let id = sample.id.clone();
        self.state.table.create(&sample, task_name).await?;

        let worker = match self.state.registry.select(task_name).await {
            Ok(worker) => worker,
            Err(err @ CoreError::NoWorkerAvailable(_)) => {
                // Resolve immediately; an accepted start never stays pending.
                let message = err.to_string();
                self.state.table.fail(&id, message.clone()).await?;
                warn!(execution_id = %id, task = task_name, "no worker available");
                return Ok(StartResponse::failure(id, message));
            }
            Err(err) => return Err(err),
        };

        self.state.table.mark_dispatched(&id, worker.clone()).await?;
        info!(
            execution_id = %id,
            worker = %worker,
            task = task_name,
            "dispatching sample"
        );

        let request = RunRequest::new(task_name, sample);
        let url = format!("{worker}/run");
        let sent = self
            .http
            .post(&url)
            .timeout(FORWARD_TIMEOUT)
            .json(&request)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(err) => {
                // Connection-level failure: the worker is out of rotation
                // until it re-registers.
                let message = format!("failed to reach worker {worker}: {err}");
                warn!(execution_id = %id, worker = %worker, error = %err, "worker unreachable");
                self.state.table.fail(&id, message.clone()).await?;
                self.state.registry.mark_unreachable(&worker).await;
                return Ok(StartResponse::failure(id, message));
            }
        };

        // From here on the worker answered, so whatever went wrong is an
        // application-level failure and the worker stays available.
        let outcome = self.resolve_worker_response(&id, response).await;
        self.state.registry.mark_idle(&worker).await;
        outcome
    }

    /// Read-only passthrough to the dispatch table.
    pub async fn status(&self, id: &SampleId) -> Result<Execution, CoreError> {
        self.state.table.get(id).await
    }

    async fn resolve_worker_response(
        &self,
        id: &SampleId,
        response: reqwest::Response,
    ) -> Result<StartResponse, CoreError> {
        let http_status = response.status();
        let run: RunResponse = match response.json().await {
            Ok(run) => run,
            Err(err) => {
                let message = format!(
                    "worker returned HTTP {http_status} with an unreadable body: {err}"
                );
                self.state.table.fail(id, message.clone()).await?;
                return Ok(StartResponse::failure(id.clone(), message));
            }
        };

        match run.status {
            Outcome::Success => {
                let result = run.result.unwrap_or(serde_json::Value::Null);
                self.state.table.complete(id, result.clone()).await?;
                info!(execution_id = %id, "execution succeeded");
                Ok(StartResponse::success(id.clone(), result))
            }
            Outcome::Failure => {
                let detail = run
                    .detail
                    .unwrap_or_else(|| "task execution failed".to_owned());
                self.state.table.fail(id, detail.clone()).await?;
                info!(execution_id = %id, detail = %detail, "execution failed");
                Ok(StartResponse::failure(id.clone(), detail))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use axum::{Json, Router};
    use dispatch_core::{ExecutionState, WorkerAddr};
    use serde_json::{json, Map, Value};
    use tokio::net::TcpListener;

    fn sample(id: &str) -> TaskSample {
        let mut data = Map::new();
        data.insert("x".to_owned(), json!(1));
        TaskSample { id: SampleId::new(id), data }
    }

    /// Bind a stub worker on an ephemeral port and return its address.
    async fn spawn_worker(app: Router) -> WorkerAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        WorkerAddr::new(format!("http://{addr}"))
    }

    /// Stub worker that echoes the sample data back.
    async fn spawn_echo_worker() -> WorkerAddr {
        let app = Router::new().route(
            "/run",
            post(|Json(req): Json<RunRequest>| async move {
                Json(RunResponse::success(Value::Object(req.data)))
            }),
        );
        spawn_worker(app).await
    }

    async fn controller_with_worker(worker: &WorkerAddr) -> Controller {
        let state = AppState::new();
        state
            .registry
            .register(worker.clone(), vec!["echo".to_owned()])
            .await;
        Controller::new(state)
    }

    #[tokio::test]
    async fn test_start_success_end_to_end() {
        let worker = spawn_echo_worker().await;
        let controller = controller_with_worker(&worker).await;

        let response = controller.start("echo", sample("s1")).await.unwrap();
        assert_eq!(response.status, Outcome::Success);
        assert_eq!(response.result, Some(json!({"x": 1})));
        assert_eq!(response.execution_id, SampleId::new("s1"));

        let execution = controller.status(&SampleId::new("s1")).await.unwrap();
        assert_eq!(execution.state, ExecutionState::Succeeded);
        assert_eq!(execution.worker, Some(worker.clone()));

        // The worker was released; a second start succeeds.
        let again = controller.start("echo", sample("s2")).await.unwrap();
        assert_eq!(again.status, Outcome::Success);
    }

    #[tokio::test]
    async fn test_validation_rejects_empty_task_name() {
        let controller = Controller::new(AppState::new());
        let err = controller.start("", sample("s1")).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_duplicate_id_is_a_protocol_error() {
        let worker = spawn_echo_worker().await;
        let controller = controller_with_worker(&worker).await;

        controller.start("echo", sample("s1")).await.unwrap();
        let err = controller.start("echo", sample("s1")).await.unwrap_err();
        assert!(matches!(err, CoreError::DuplicateId(_)));
    }

    #[tokio::test]
    async fn test_no_worker_resolves_terminally() {
        let controller = Controller::new(AppState::new());

        let response = controller.start("unknown_task", sample("s1")).await.unwrap();
        assert_eq!(response.status, Outcome::Failure);

        let execution = controller.status(&SampleId::new("s1")).await.unwrap();
        assert_eq!(execution.state, ExecutionState::Failed);
        assert!(execution.error.is_some());
    }

    #[tokio::test]
    async fn test_task_failure_keeps_worker_available() {
        let app = Router::new().route(
            "/run",
            post(|Json(_): Json<RunRequest>| async move {
                Json(RunResponse::failure("task blew up"))
            }),
        );
        let worker = spawn_worker(app).await;
        let controller = controller_with_worker(&worker).await;

        let response = controller.start("echo", sample("s1")).await.unwrap();
        assert_eq!(response.status, Outcome::Failure);
        assert_eq!(response.error.as_deref(), Some("task blew up"));

        let execution = controller.status(&SampleId::new("s1")).await.unwrap();
        assert_eq!(execution.state, ExecutionState::Failed);

        // Application-level failure: the worker is still selectable.
        assert!(controller.state.registry.select("echo").await.is_ok());
    }

    #[tokio::test]
    async fn test_transport_failure_marks_worker_unreachable() {
        // Bind a listener to reserve a port, then drop it so connecting fails.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead = WorkerAddr::new(format!("http://{}", listener.local_addr().unwrap()));
        drop(listener);

        let controller = controller_with_worker(&dead).await;

        let response = controller.start("echo", sample("s1")).await.unwrap();
        assert_eq!(response.status, Outcome::Failure);

        let execution = controller.status(&SampleId::new("s1")).await.unwrap();
        assert_eq!(execution.state, ExecutionState::Failed);

        // Excluded from selection until it re-registers.
        let err = controller.state.registry.select("echo").await.unwrap_err();
        assert!(matches!(err, CoreError::NoWorkerAvailable(_)));

        controller
            .state
            .registry
            .register(dead.clone(), vec!["echo".to_owned()])
            .await;
        assert!(controller.state.registry.select("echo").await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_starts_all_reach_terminal_state() {
        let worker = spawn_echo_worker().await;
        let controller = Arc::new(controller_with_worker(&worker).await);

        let mut handles = Vec::new();
        for i in 0..8 {
            let controller = controller.clone();
            handles.push(tokio::spawn(async move {
                controller.start("echo", sample(&format!("s{i}"))).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // Exactly N executions, every one terminal; with a single-slot worker
        // the losers resolved to failed rather than waiting.
        assert_eq!(controller.state.table.len().await, 8);
        for i in 0..8 {
            let execution = controller
                .status(&SampleId::new(format!("s{i}")))
                .await
                .unwrap();
            assert!(execution.is_terminal(), "s{i} not terminal");
        }
    }
}
