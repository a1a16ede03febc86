//! Task store
//!
//! Holds the session's task list and reconciles it with what the server
//! returns. Entries only appear once the server has confirmed them.
//!
//! Overlapping loads are ordered by sequence number: a load that has been
//! superseded by a newer one is discarded. Mutations confirmed while a load
//! is in flight are journaled and replayed over that load's result.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::Error;
use crate::gateway::TaskGateway;
use crate::task::{SortKey, Task, TaskPatch, TaskRequest, TaskStatus};
use crate::Result;

/// A server-confirmed change to the task list
#[derive(Debug, Clone)]
enum Mutation {
    Added(Task),
    Updated(Task),
    Removed(i64),
}

#[derive(Debug, Default)]
struct StoreState {
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
    /// Sequence number of the most recently started load
    load_seq: u64,
    /// Mutations confirmed while a load was in flight, tagged with the
    /// load sequence current at confirmation
    journal: Vec<(u64, Mutation)>,
}

impl StoreState {
    fn apply(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::Added(task) => {
                if !self.tasks.iter().any(|t| t.id == task.id) {
                    self.tasks.push(task.clone());
                }
            }
            Mutation::Updated(task) => {
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                    *slot = task.clone();
                }
            }
            Mutation::Removed(id) => self.tasks.retain(|t| t.id != *id),
        }
    }

    fn confirm(&mut self, mutation: Mutation) {
        self.apply(&mutation);
        if self.loading {
            self.journal.push((self.load_seq, mutation));
        }
    }
}

/// Clears `loading` if a load future is dropped before it finishes, so
/// mutations stop being journaled for a load that will never apply.
struct LoadGuard {
    state: Arc<RwLock<StoreState>>,
    seq: u64,
    armed: bool,
}

impl LoadGuard {
    fn reset(state: &mut StoreState, seq: u64) {
        if state.load_seq == seq {
            state.loading = false;
            state.journal.clear();
        }
    }
}

impl Drop for LoadGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!("Load #{} was cancelled before it completed", self.seq);

        if let Ok(mut state) = self.state.try_write() {
            Self::reset(&mut state, self.seq);
            return;
        }

        // Lock is busy; finish the reset on the runtime if there is one
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let state = Arc::clone(&self.state);
            let seq = self.seq;
            handle.spawn(async move {
                Self::reset(&mut *state.write().await, seq);
            });
        }
    }
}

/// Shared task store.
///
/// Cloning is cheap; clones share the same state and gateway.
#[derive(Clone)]
pub struct TaskStore {
    gateway: Arc<dyn TaskGateway>,
    state: Arc<RwLock<StoreState>>,
}

impl TaskStore {
    /// Create an empty store backed by `gateway`
    pub fn new(gateway: Arc<dyn TaskGateway>) -> Self {
        Self {
            gateway,
            state: Arc::new(RwLock::new(StoreState::default())),
        }
    }

    /// The gateway this store issues requests through
    pub fn gateway(&self) -> &Arc<dyn TaskGateway> {
        &self.gateway
    }

    /// Snapshot of the current task list
    pub async fn tasks(&self) -> Vec<Task> {
        self.state.read().await.tasks.clone()
    }

    /// Find a task in the current snapshot
    pub async fn find(&self, id: i64) -> Option<Task> {
        self.state
            .read()
            .await
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    pub async fn loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Last error message, if one is being shown
    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    /// Replace the displayed error; `None` dismisses it
    pub async fn set_error(&self, error: Option<String>) {
        self.state.write().await.error = error;
    }

    pub async fn clear_error(&self) {
        self.set_error(None).await;
    }

    /// Fetch the task list from the server, replacing the local snapshot.
    ///
    /// Failures are recorded in [`error`](Self::error) rather than returned.
    pub async fn load(&self) {
        let seq = {
            let mut state = self.state.write().await;
            state.load_seq += 1;
            state.loading = true;
            state.error = None;
            state.load_seq
        };

        let mut guard = LoadGuard {
            state: Arc::clone(&self.state),
            seq,
            armed: true,
        };
        let result = self.gateway.list().await;

        let mut state = self.state.write().await;
        guard.armed = false;
        if state.load_seq != seq {
            warn!("Discarding task list from superseded load #{}", seq);
            return;
        }

        let journal = std::mem::take(&mut state.journal);
        match result {
            Ok(tasks) => {
                state.tasks = tasks;
                for (recorded_at, mutation) in journal.iter() {
                    if *recorded_at >= seq {
                        state.apply(mutation);
                    }
                }
                info!("Loaded {} tasks", state.tasks.len());
            }
            Err(e) => {
                warn!("Failed to load tasks: {}", e);
                state.error = Some(e.normalized());
            }
        }
        state.loading = false;
    }

    /// Same as [`load`](Self::load)
    pub async fn reload(&self) {
        self.load().await;
    }

    /// Create a task on the server and append it.
    ///
    /// On failure the error is recorded and also returned, so a form can
    /// show field errors.
    pub async fn add(&self, request: &TaskRequest) -> Result<Task> {
        match self.gateway.create(request).await {
            Ok(task) => {
                info!("Added task {}", task.id);
                self.state
                    .write()
                    .await
                    .confirm(Mutation::Added(task.clone()));
                Ok(task)
            }
            Err(e) => {
                self.record_failure("add task", &e).await;
                Err(e)
            }
        }
    }

    /// Replace a task with the server's updated version, keeping its position
    pub async fn update(&self, id: i64, request: &TaskRequest) -> Result<Task> {
        match self.gateway.update(id, request).await {
            Ok(task) => {
                info!("Updated task {}", id);
                self.state
                    .write()
                    .await
                    .confirm(Mutation::Updated(task.clone()));
                Ok(task)
            }
            Err(e) => {
                self.record_failure("update task", &e).await;
                Err(e)
            }
        }
    }

    /// Apply a partial change to a known task.
    ///
    /// The patch is merged onto the stored task and sent as a full update.
    pub async fn patch(&self, id: i64, patch: &TaskPatch) -> Result<Task> {
        let existing = self.find(id).await.ok_or_else(|| Error::not_found(id))?;
        let request = patch.apply_to(&existing);
        self.update(id, &request).await
    }

    /// Change only the status of a known task
    pub async fn change_status(&self, id: i64, status: TaskStatus) -> Result<Task> {
        self.patch(id, &TaskPatch::status(status)).await
    }

    /// Delete a task on the server and drop it locally.
    ///
    /// Returns whether the task was deleted. Failures are only recorded in
    /// [`error`](Self::error); the entry stays in the list.
    pub async fn remove(&self, id: i64) -> bool {
        match self.gateway.remove(id).await {
            Ok(()) => {
                info!("Removed task {}", id);
                self.state.write().await.confirm(Mutation::Removed(id));
                true
            }
            Err(e) => {
                self.record_failure("remove task", &e).await;
                false
            }
        }
    }

    /// Reorder the local snapshot. No request is made and the order is lost
    /// on the next load.
    pub async fn sort(&self, by: SortKey) {
        let mut state = self.state.write().await;
        by.sort(&mut state.tasks);
    }

    async fn record_failure(&self, action: &str, error: &Error) {
        warn!("Failed to {}: {}", action, error);
        self.state.write().await.error = Some(error.normalized());
    }
}
