//! Error types for the dispatch client.

use thiserror::Error;

/// Errors that can occur when talking to the controller.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The network call could not complete.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The controller rejected the request.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
