//! Shared controller state.

use std::sync::Arc;

use crate::registry::WorkerRegistry;
use crate::table::DispatchTable;

/// Shared controller state: the dispatch table and the worker registry.
///
/// Constructed once at process start and passed by reference; there is no
/// ambient global instance.
#[derive(Default)]
pub struct AppState {
    /// Executions indexed by sample id.
    pub table: DispatchTable,

    /// Registered worker endpoints.
    pub registry: WorkerRegistry,
}

impl AppState {
    /// Create a new AppState wrapped in Arc.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}
