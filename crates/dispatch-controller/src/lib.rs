//! Dispatch Controller Library
//!
//! This crate provides the controller side of the dispatch service: the
//! dispatch table tracking executions, the worker registry, the start/status
//! orchestration and the HTTP surface.

pub mod config;
pub mod controller;
pub mod http;
pub mod registry;
pub mod state;
pub mod table;

pub use config::Config;
pub use controller::Controller;
pub use registry::WorkerRegistry;
pub use state::AppState;
pub use table::DispatchTable;
