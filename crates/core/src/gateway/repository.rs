//! Task gateway trait
//!
//! Defines the remote operations the store relies on.

use async_trait::async_trait;

use crate::task::{Task, TaskRequest};
use crate::Result;

/// Remote CRUD interface for tasks.
///
/// Implementations hold no task state; every call goes to the server.
#[async_trait]
pub trait TaskGateway: Send + Sync {
    /// Get all tasks in server order
    async fn list(&self) -> Result<Vec<Task>>;

    /// Get a task by ID
    async fn get(&self, id: i64) -> Result<Task>;

    /// Create a task; the server assigns its id
    async fn create(&self, request: &TaskRequest) -> Result<Task>;

    /// Replace the fields of an existing task
    async fn update(&self, id: i64, request: &TaskRequest) -> Result<Task>;

    /// Delete a task by ID
    async fn remove(&self, id: i64) -> Result<()>;
}
