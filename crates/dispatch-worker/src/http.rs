//! HTTP surface of the worker.
//!
//! `POST /run` executes one sample. Task faults are caught at this boundary
//! and converted into a tagged failure payload; they never cross the network
//! as protocol errors. Only an unknown task or a malformed body answers 4xx.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use dispatch_core::{RunRequest, RunResponse};

use crate::task_set::TaskSet;

/// Error body for protocol-level (non-2xx) responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Create the worker HTTP router.
pub fn create_router(tasks: Arc<TaskSet>) -> Router {
    Router::new()
        .route("/run", post(run))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(tasks)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Execute one sample against the resolved task.
async fn run(State(tasks): State<Arc<TaskSet>>, Json(request): Json<RunRequest>) -> Response {
    let task = match tasks.resolve(request.task_name.as_deref()) {
        Ok(task) => task,
        Err(err) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response();
        }
    };

    let sample = request.into_sample();
    let sample_id = sample.id.clone();

    // Run on a separate tokio task so even a panicking implementation
    // resolves to a structured failure.
    let outcome = tokio::spawn(async move { task.run(sample).await }).await;

    let response = match outcome {
        Ok(Ok(result)) => {
            info!(sample_id = %sample_id, "task succeeded");
            RunResponse::success(result)
        }
        Ok(Err(err)) => {
            warn!(sample_id = %sample_id, error = %err, "task failed");
            RunResponse::failure(err.to_string())
        }
        Err(join_err) => {
            warn!(sample_id = %sample_id, error = %join_err, "task aborted");
            RunResponse::failure(format!("task aborted: {join_err}"))
        }
    };
    Json(response).into_response()
}
