//! Dispatch Worker Library
//!
//! Hosts pluggable [`dispatch_core::Task`] implementations behind an HTTP
//! `/run` endpoint. Task faults never cross the network boundary: every
//! execution resolves to a structured success or failure payload.

pub mod http;
pub mod task_set;
pub mod tasks;

pub use task_set::{TaskSet, TaskSetError};
pub use tasks::EchoTask;
