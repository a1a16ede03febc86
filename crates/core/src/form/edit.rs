//! Edit modal for an existing task

use tracing::debug;

use super::{submission_errors, TaskFields};
use crate::store::TaskStore;
use crate::task::{FieldErrors, Task};

#[derive(Debug, Clone)]
pub struct EditModal {
    task_id: i64,
    pub fields: TaskFields,
    errors: FieldErrors,
    open: bool,
}

impl EditModal {
    /// Open the modal with fields taken from `task`
    pub fn open(task: &Task) -> Self {
        Self {
            task_id: task.id,
            fields: TaskFields::from_task(task),
            errors: FieldErrors::new(),
            open: true,
        }
    }

    pub fn task_id(&self) -> i64 {
        self.task_id
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Close without saving
    pub fn cancel(&mut self) {
        self.open = false;
    }

    /// Validate and send the edited fields; closes the modal on success
    pub async fn save(&mut self, store: &TaskStore) -> Option<Task> {
        if !self.open {
            return None;
        }
        self.errors.clear();

        let request = match self.fields.to_request() {
            Ok(request) => request,
            Err(errors) => {
                debug!("Edit of task {} blocked by {} field error(s)", self.task_id, errors.len());
                self.errors = errors;
                return None;
            }
        };

        match store.update(self.task_id, &request).await {
            Ok(task) => {
                self.open = false;
                Some(task)
            }
            Err(e) => {
                self.errors = submission_errors(&e);
                None
            }
        }
    }
}
