//! Dispatch Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Runtime specifics
//!
//! All types here represent the core business domain of the dispatch service.

pub mod error;
pub mod execution;
pub mod ids;
pub mod sample;
pub mod status;
pub mod task;
pub mod wire;

// Re-export commonly used types
pub use error::CoreError;
pub use execution::Execution;
pub use ids::{SampleId, WorkerAddr};
pub use sample::TaskSample;
pub use status::{ExecutionState, WorkerStatus};
pub use task::{Task, TaskError};
pub use wire::{Outcome, RegisterRequest, RunRequest, RunResponse, StartRequest, StartResponse};
