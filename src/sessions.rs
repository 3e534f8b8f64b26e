//! Per-browser workflow state.
//!
//! Each browser session carries a workflow id; the registry maps it to the
//! [`WorkflowSession`] guarded by an async mutex that is held for the whole
//! save or finalize call. Idle workflows are dropped when new ones are
//! created, and the registry never holds more than its capacity.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::domain::workflow::WorkflowSession;

pub type SharedWorkflow = Arc<tokio::sync::Mutex<WorkflowSession>>;

/// Workflows untouched for this long are dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(12 * 60 * 60);
pub const DEFAULT_CAPACITY: usize = 10_000;

#[derive(Debug)]
struct Entry {
    workflow: SharedWorkflow,
    last_access: Instant,
}

impl Entry {
    /// A request is still holding the workflow.
    fn in_use(&self) -> bool {
        Arc::strong_count(&self.workflow) > 1
    }
}

#[derive(Debug)]
pub struct WorkflowRegistry {
    sessions: Mutex<HashMap<Uuid, Entry>>,
    idle_timeout: Duration,
    capacity: usize,
}

impl Default for WorkflowRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT, DEFAULT_CAPACITY)
    }
}

impl WorkflowRegistry {
    pub fn new(idle_timeout: Duration, capacity: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Entry>> {
        match self.sessions.lock() {
            Ok(sessions) => sessions,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Workflow of `id`, created empty on first use.
    pub fn get_or_create(&self, id: Uuid) -> SharedWorkflow {
        let mut sessions = self.lock();
        let now = Instant::now();

        if let Some(entry) = sessions.get_mut(&id) {
            entry.last_access = now;
            return entry.workflow.clone();
        }

        self.evict(&mut sessions, now);

        let workflow = SharedWorkflow::default();
        sessions.insert(
            id,
            Entry {
                workflow: workflow.clone(),
                last_access: now,
            },
        );
        workflow
    }

    /// Drops idle workflows, then the least recently used ones until a new
    /// entry fits. Workflows held by a request are kept.
    fn evict(&self, sessions: &mut HashMap<Uuid, Entry>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, entry| {
            entry.in_use() || now.duration_since(entry.last_access) < self.idle_timeout
        });

        while sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .filter(|(_, entry)| !entry.in_use())
                .min_by_key(|(_, entry)| entry.last_access)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                }
                None => break,
            }
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            log::debug!("Evicted {evicted} workflow(s), {} remain", sessions.len());
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow::ReportState;

    #[tokio::test]
    async fn same_id_shares_the_workflow() {
        let registry = WorkflowRegistry::default();
        let id = Uuid::new_v4();

        registry.get_or_create(id).lock().await.state = ReportState::Saved;

        assert_eq!(registry.get_or_create(id).lock().await.state, ReportState::Saved);
        assert_eq!(
            registry.get_or_create(Uuid::new_v4()).lock().await.state,
            ReportState::Draft
        );
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn held_workflow_rejects_second_finalize() {
        let registry = WorkflowRegistry::default();
        let id = Uuid::new_v4();
        let workflow = registry.get_or_create(id);

        let _in_flight = workflow.lock().await;

        assert!(registry.get_or_create(id).try_lock().is_err());
    }

    #[tokio::test]
    async fn idle_workflows_are_evicted_on_insert() {
        let registry = WorkflowRegistry::new(Duration::ZERO, DEFAULT_CAPACITY);
        let idle = Uuid::new_v4();
        registry.get_or_create(idle).lock().await.state = ReportState::Saved;
        let held = registry.get_or_create(Uuid::new_v4());

        registry.get_or_create(Uuid::new_v4());

        // The idle one is gone, the held one survives.
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get_or_create(idle).lock().await.state, ReportState::Draft);
        drop(held);
    }

    #[test]
    fn capacity_drops_least_recently_used() {
        let registry = WorkflowRegistry::new(DEFAULT_IDLE_TIMEOUT, 2);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        registry.get_or_create(first);
        registry.get_or_create(second);
        registry.get_or_create(first);

        registry.get_or_create(Uuid::new_v4());

        assert_eq!(registry.len(), 2);
        let sessions = registry.lock();
        assert!(sessions.contains_key(&first));
        assert!(!sessions.contains_key(&second));
    }
}
