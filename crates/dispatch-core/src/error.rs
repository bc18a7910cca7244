//! Core domain errors.

use crate::ids::SampleId;
use crate::status::ExecutionState;
use thiserror::Error;

/// Core domain errors for the dispatch service.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed request input.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A sample id was reused for a second execution.
    #[error("Duplicate sample id: {0}")]
    DuplicateId(SampleId),

    /// No execution exists for the given id.
    #[error("Execution not found: {0}")]
    NotFound(SampleId),

    /// Attempted state transition that does not advance forward.
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: ExecutionState,
        to: ExecutionState,
    },

    /// No idle worker advertises the requested task.
    #[error("No worker available for task: {0}")]
    NoWorkerAvailable(String),
}
