//! HTTP client for the controller API.

use serde_json::{Map, Value};
use tracing::debug;

use dispatch_core::{
    Execution, RegisterRequest, SampleId, StartRequest, StartResponse, TaskSample, WorkerAddr,
};

use crate::error::ClientError;

/// Client for the dispatch controller's HTTP API.
pub struct DispatchClient {
    inner: reqwest::Client,
    base_url: String,
}

impl DispatchClient {
    /// Create a new client for the given controller base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Check if the controller is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let url = format!("{}/health", self.base_url);
        debug!(url = %url, "checking health");

        let response = self.inner.get(&url).send().await?;
        Ok(response.status().is_success())
    }

    /// Start a task against a sample and return the structured outcome.
    pub async fn start(
        &self,
        task_name: &str,
        sample: TaskSample,
    ) -> Result<StartResponse, ClientError> {
        let request = StartRequest::new(task_name, sample.data).with_id(sample.id);
        self.start_request(&request).await
    }

    /// Start a task from sample data, letting the controller generate the id.
    pub async fn run_sample(
        &self,
        task_name: &str,
        data: Map<String, Value>,
    ) -> Result<StartResponse, ClientError> {
        self.start_request(&StartRequest::new(task_name, data)).await
    }

    /// Issue a raw start request.
    pub async fn start_request(
        &self,
        request: &StartRequest,
    ) -> Result<StartResponse, ClientError> {
        let url = format!("{}/start", self.base_url);
        debug!(url = %url, task = %request.task_name, "starting task");

        let response = self.inner.post(&url).json(request).send().await?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Serialization(e.to_string()))
    }

    /// Fetch the current state of an execution.
    pub async fn status(&self, id: &SampleId) -> Result<Execution, ClientError> {
        let url = format!("{}/status/{}", self.base_url, id);
        debug!(url = %url, "fetching execution status");

        let response = self.inner.get(&url).send().await?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Serialization(e.to_string()))
    }

    /// Register a worker endpoint with the controller.
    pub async fn register_worker(
        &self,
        addr: WorkerAddr,
        capabilities: Vec<String>,
    ) -> Result<(), ClientError> {
        let url = format!("{}/workers/register", self.base_url);
        debug!(url = %url, worker = %addr, "registering worker");

        let request = RegisterRequest { addr, capabilities };
        let response = self.inner.post(&url).json(&request).send().await?;
        check_status(response).await?;
        Ok(())
    }

    /// List the controller's registered workers.
    pub async fn workers(&self) -> Result<Value, ClientError> {
        let url = format!("{}/workers", self.base_url);
        let response = self.inner.get(&url).send().await?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Serialization(e.to_string()))
    }
}

/// Map protocol-level error responses onto [`ClientError`].
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("<unreadable body>"));
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound(message));
    }
    Err(ClientError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;
    use tokio::net::TcpListener;

    /// Stub controller implementing just enough of the API for the client.
    async fn spawn_stub_controller() -> String {
        let app = Router::new()
            .route("/health", get(|| async { Json(json!({"status": "ok"})) }))
            .route(
                "/start",
                post(|Json(req): Json<StartRequest>| async move {
                    let sample = req.into_sample();
                    Json(StartResponse::success(
                        sample.id,
                        Value::Object(sample.data),
                    ))
                }),
            )
            .route(
                "/status/:id",
                get(|axum::extract::Path(id): axum::extract::Path<String>| async move {
                    if id == "known" {
                        Json(Execution::new(SampleId::new(id), "echo")).into_response()
                    } else {
                        (StatusCode::NOT_FOUND, Json(json!({"error": "not found"})))
                            .into_response()
                    }
                }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_health() {
        let url = spawn_stub_controller().await;
        let client = DispatchClient::new(&url);
        assert!(client.health().await.unwrap());
    }

    #[tokio::test]
    async fn test_start_round_trip() {
        let url = spawn_stub_controller().await;
        let client = DispatchClient::new(&url);

        let mut data = Map::new();
        data.insert("x".to_owned(), json!(1));
        let sample = TaskSample::new(data).with_id(SampleId::new("s1"));

        let response = client.start("echo", sample).await.unwrap();
        assert_eq!(response.execution_id, SampleId::new("s1"));
        assert_eq!(response.result, Some(json!({"x": 1})));
    }

    #[tokio::test]
    async fn test_status_not_found() {
        let url = spawn_stub_controller().await;
        let client = DispatchClient::new(&url);

        assert!(client.status(&SampleId::new("known")).await.is_ok());
        let err = client.status(&SampleId::new("missing")).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unreachable_controller_is_transport_error() {
        let client = DispatchClient::new("http://127.0.0.1:1");
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
