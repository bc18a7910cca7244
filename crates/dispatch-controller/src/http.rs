//! HTTP surface of the controller.
//!
//! `POST /start` and `GET /status/:id` are the wire contract with clients;
//! `POST /workers/register` and `GET /workers` manage the registry, and
//! `GET /health` is the liveness probe.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::error;

use dispatch_core::{CoreError, RegisterRequest, SampleId, StartRequest};

use crate::controller::Controller;

/// Error body for protocol-level (non-2xx) responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Create the controller HTTP router.
pub fn create_router(controller: Arc<Controller>) -> Router {
    Router::new()
        .route("/start", post(start))
        .route("/status/:id", get(status))
        .route("/workers/register", post(register_worker))
        .route("/workers", get(list_workers))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(controller)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Accept a task-start request and run it end-to-end.
///
/// Every accepted dispatch answers 200 with a structured outcome; only
/// malformed input or a reused sample id yields a protocol-level error.
async fn start(
    State(controller): State<Arc<Controller>>,
    Json(request): Json<StartRequest>,
) -> Response {
    let task_name = request.task_name.clone();
    let sample = request.into_sample();
    match controller.start(&task_name, sample).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Report the current state of one execution.
async fn status(
    State(controller): State<Arc<Controller>>,
    Path(id): Path<String>,
) -> Response {
    match controller.status(&SampleId::new(id)).await {
        Ok(execution) => (StatusCode::OK, Json(execution)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Register (or re-register) a worker endpoint.
async fn register_worker(
    State(controller): State<Arc<Controller>>,
    Json(request): Json<RegisterRequest>,
) -> Response {
    if request.capabilities.is_empty() {
        return error_response(CoreError::Validation(
            "capabilities must not be empty".into(),
        ));
    }
    controller
        .state
        .registry
        .register(request.addr, request.capabilities)
        .await;
    Json(serde_json::json!({ "status": "ok" })).into_response()
}

/// List registered workers with status and capabilities.
async fn list_workers(State(controller): State<Arc<Controller>>) -> Response {
    Json(controller.state.registry.list().await).into_response()
}

fn error_response(err: CoreError) -> Response {
    let status = match &err {
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::DuplicateId(_) => StatusCode::CONFLICT,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::NoWorkerAvailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        CoreError::InvalidTransition { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(error = %err, "internal consistency violation");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}
