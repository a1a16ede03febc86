//! Task creation form

use tracing::debug;

use super::{submission_errors, TaskFields};
use crate::store::TaskStore;
use crate::task::{FieldErrors, Task};

#[derive(Debug, Clone, Default)]
pub struct CreateForm {
    pub fields: TaskFields,
    errors: FieldErrors,
}

impl CreateForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors from the last submission
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Validate and create the task.
    ///
    /// Invalid input never reaches the store. On success the fields are
    /// reset; on failure the server's field errors, or a global message,
    /// are kept for display.
    pub async fn submit(&mut self, store: &TaskStore) -> Option<Task> {
        self.errors.clear();

        let request = match self.fields.to_request() {
            Ok(request) => request,
            Err(errors) => {
                debug!("Create form blocked by {} field error(s)", errors.len());
                self.errors = errors;
                return None;
            }
        };

        match store.add(&request).await {
            Ok(task) => {
                self.fields = TaskFields::default();
                Some(task)
            }
            Err(e) => {
                self.errors = submission_errors(&e);
                None
            }
        }
    }
}
