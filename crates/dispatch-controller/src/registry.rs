//! Worker registry - discovery and capability-based selection.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use dispatch_core::{CoreError, WorkerAddr, WorkerStatus};

/// Registry entry for one worker endpoint.
#[derive(Debug, Clone)]
struct WorkerEntry {
    capabilities: HashSet<String>,
    status: WorkerStatus,
}

/// Snapshot of a registry entry for the `GET /workers` listing.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerSnapshot {
    pub addr: WorkerAddr,
    pub capabilities: Vec<String>,
    pub status: WorkerStatus,
}

/// Tracks known worker endpoints and their availability.
///
/// Selection claims the chosen worker under the same write lock that found
/// it, so one worker endpoint is never handed two unresolved dispatches.
#[derive(Default)]
pub struct WorkerRegistry {
    workers: RwLock<HashMap<WorkerAddr, WorkerEntry>>,
    cursor: AtomicUsize,
}

impl WorkerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a worker's capability set; idempotent by address.
    ///
    /// Re-registration resets the status to idle, which is also the recovery
    /// path for a worker previously marked unreachable.
    pub async fn register(
        &self,
        addr: WorkerAddr,
        capabilities: impl IntoIterator<Item = String>,
    ) {
        let capabilities: HashSet<String> = capabilities.into_iter().collect();
        let mut workers = self.workers.write().await;
        let replaced = workers
            .insert(
                addr.clone(),
                WorkerEntry {
                    capabilities: capabilities.clone(),
                    status: WorkerStatus::Idle,
                },
            )
            .is_some();
        info!(
            worker = %addr,
            capabilities = ?capabilities,
            replaced,
            "worker registered"
        );
    }

    /// Select an idle worker able to run `task_name` and claim it.
    ///
    /// Eligible candidates are tried round-robin; the returned worker is
    /// marked busy before the lock is released. Fails with
    /// [`CoreError::NoWorkerAvailable`] when no idle worker advertises the
    /// task, including when all qualifying workers are busy or unreachable.
    pub async fn select(&self, task_name: &str) -> Result<WorkerAddr, CoreError> {
        let mut workers = self.workers.write().await;

        let mut eligible: Vec<WorkerAddr> = workers
            .iter()
            .filter(|(_, entry)| {
                entry.status.is_available() && entry.capabilities.contains(task_name)
            })
            .map(|(addr, _)| addr.clone())
            .collect();

        if eligible.is_empty() {
            return Err(CoreError::NoWorkerAvailable(task_name.to_owned()));
        }

        // HashMap iteration order is arbitrary; sort so the cursor walks a
        // stable ring.
        eligible.sort();
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % eligible.len();
        let selected = eligible.swap_remove(index);

        if let Some(entry) = workers.get_mut(&selected) {
            entry.status = WorkerStatus::Busy;
        }
        Ok(selected)
    }

    /// Release a worker back to idle after its dispatch resolved.
    ///
    /// Only a busy worker flips back; a concurrent unreachable mark is not
    /// overwritten.
    pub async fn mark_idle(&self, addr: &WorkerAddr) {
        let mut workers = self.workers.write().await;
        if let Some(entry) = workers.get_mut(addr) {
            if entry.status == WorkerStatus::Busy {
                entry.status = WorkerStatus::Idle;
            }
        }
    }

    /// Exclude a worker from selection after a connection-level failure.
    ///
    /// The worker stays excluded until it re-registers.
    pub async fn mark_unreachable(&self, addr: &WorkerAddr) {
        let mut workers = self.workers.write().await;
        if let Some(entry) = workers.get_mut(addr) {
            entry.status = WorkerStatus::Unreachable;
            warn!(worker = %addr, "worker marked unreachable");
        }
    }

    /// Snapshot of all registered workers.
    pub async fn list(&self) -> Vec<WorkerSnapshot> {
        let workers = self.workers.read().await;
        let mut snapshot: Vec<WorkerSnapshot> = workers
            .iter()
            .map(|(addr, entry)| {
                let mut capabilities: Vec<String> =
                    entry.capabilities.iter().cloned().collect();
                capabilities.sort();
                WorkerSnapshot {
                    addr: addr.clone(),
                    capabilities,
                    status: entry.status,
                }
            })
            .collect();
        snapshot.sort_by(|a, b| a.addr.cmp(&b.addr));
        snapshot
    }

    /// Number of registered workers.
    pub async fn len(&self) -> usize {
        self.workers.read().await.len()
    }

    /// Returns true if no workers are registered.
    pub async fn is_empty(&self) -> bool {
        self.workers.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u16) -> WorkerAddr {
        WorkerAddr::new(format!("http://127.0.0.1:{n}"))
    }

    async fn registry_with(addrs: &[u16]) -> WorkerRegistry {
        let registry = WorkerRegistry::new();
        for &n in addrs {
            registry.register(addr(n), vec!["echo".to_owned()]).await;
        }
        registry
    }

    #[tokio::test]
    async fn test_register_is_idempotent_by_address() {
        let registry = WorkerRegistry::new();
        registry.register(addr(1), vec!["echo".to_owned()]).await;
        registry.register(addr(1), vec!["echo".to_owned()]).await;
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_select_claims_the_worker() {
        let registry = registry_with(&[1]).await;

        let selected = registry.select("echo").await.unwrap();
        assert_eq!(selected, addr(1));

        // The single worker is now busy, so a second select comes up empty.
        let err = registry.select("echo").await.unwrap_err();
        assert!(matches!(err, CoreError::NoWorkerAvailable(_)));

        registry.mark_idle(&selected).await;
        assert!(registry.select("echo").await.is_ok());
    }

    #[tokio::test]
    async fn test_select_filters_by_capability() {
        let registry = registry_with(&[1]).await;
        let err = registry.select("resize").await.unwrap_err();
        assert!(matches!(err, CoreError::NoWorkerAvailable(_)));
    }

    #[tokio::test]
    async fn test_round_robin_over_eligible_workers() {
        let registry = registry_with(&[1, 2]).await;

        let first = registry.select("echo").await.unwrap();
        registry.mark_idle(&first).await;
        let second = registry.select("echo").await.unwrap();
        registry.mark_idle(&second).await;

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_unreachable_excluded_until_reregistration() {
        let registry = registry_with(&[1]).await;
        let worker = registry.select("echo").await.unwrap();
        registry.mark_unreachable(&worker).await;

        assert!(registry.select("echo").await.is_err());

        // mark_idle must not resurrect an unreachable worker.
        registry.mark_idle(&worker).await;
        assert!(registry.select("echo").await.is_err());

        registry.register(worker.clone(), vec!["echo".to_owned()]).await;
        assert_eq!(registry.select("echo").await.unwrap(), worker);
    }

    #[tokio::test]
    async fn test_list_snapshot() {
        let registry = registry_with(&[2, 1]).await;
        let snapshot = registry.list().await;
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].addr, addr(1));
        assert_eq!(snapshot[0].capabilities, vec!["echo".to_owned()]);
        assert_eq!(snapshot[0].status, WorkerStatus::Idle);
    }
}
