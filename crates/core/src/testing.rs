//! In-memory gateway used by store and form tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{oneshot, Mutex};

use crate::gateway::TaskGateway;
use crate::task::{validate, Task, TaskRequest};
use crate::{Error, Result};

/// A list call held open until the test releases it
pub struct HeldList {
    pub entered: oneshot::Receiver<()>,
    pub release: oneshot::Sender<()>,
}

struct Gate {
    entered: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

#[derive(Default)]
struct Server {
    next_id: i64,
    tasks: Vec<Task>,
}

#[derive(Default)]
pub struct MockGateway {
    server: Mutex<Server>,
    failures: Mutex<VecDeque<Error>>,
    gates: Mutex<VecDeque<Gate>>,
    pub list_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub remove_calls: AtomicUsize,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a task directly on the fake server
    pub async fn insert_remote(&self, request: TaskRequest) -> Task {
        let mut server = self.server.lock().await;
        server.next_id += 1;
        let task = to_task(server.next_id, request);
        server.tasks.push(task.clone());
        task
    }

    pub async fn remote_tasks(&self) -> Vec<Task> {
        self.server.lock().await.tasks.clone()
    }

    /// Make the next gateway call fail with `error`
    pub async fn fail_next(&self, error: Error) {
        self.failures.lock().await.push_back(error);
    }

    /// Hold the next `list` call until released
    pub async fn hold_list(&self) -> HeldList {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        self.gates.lock().await.push_back(Gate {
            entered: entered_tx,
            release: release_rx,
        });
        HeldList {
            entered: entered_rx,
            release: release_tx,
        }
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    async fn injected_failure(&self) -> Result<()> {
        match self.failures.lock().await.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn to_task(id: i64, request: TaskRequest) -> Task {
    Task {
        id,
        title: request.title,
        description: request.description,
        status: request.status.unwrap_or_default(),
        due_date: request.due_date,
    }
}

fn reject_invalid(request: &TaskRequest) -> Result<()> {
    let field_errors = validate(&request.title, request.description.as_deref().unwrap_or(""));
    if field_errors.is_empty() {
        return Ok(());
    }
    Err(Error::Validation {
        field_errors,
        server_message: Some("Validation failed".to_string()),
    })
}

#[async_trait]
impl TaskGateway for MockGateway {
    async fn list(&self) -> Result<Vec<Task>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.injected_failure().await?;
        let snapshot = self.server.lock().await.tasks.clone();

        let gate = self.gates.lock().await.pop_front();
        if let Some(gate) = gate {
            let _ = gate.entered.send(());
            let _ = gate.release.await;
        }
        Ok(snapshot)
    }

    async fn get(&self, id: i64) -> Result<Task> {
        self.injected_failure().await?;
        let server = self.server.lock().await;
        server
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found(id))
    }

    async fn create(&self, request: &TaskRequest) -> Result<Task> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.injected_failure().await?;
        reject_invalid(request)?;
        Ok(self.insert_remote(request.clone()).await)
    }

    async fn update(&self, id: i64, request: &TaskRequest) -> Result<Task> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.injected_failure().await?;
        reject_invalid(request)?;
        let mut server = self.server.lock().await;
        let slot = server
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::not_found(id))?;
        *slot = to_task(id, request.clone());
        Ok(slot.clone())
    }

    async fn remove(&self, id: i64) -> Result<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        self.injected_failure().await?;
        let mut server = self.server.lock().await;
        let before = server.tasks.len();
        server.tasks.retain(|t| t.id != id);
        if server.tasks.len() == before {
            return Err(Error::not_found(id));
        }
        Ok(())
    }
}
