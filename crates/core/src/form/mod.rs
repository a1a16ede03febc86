//! Form module
//!
//! Headless create form and edit modal. Both collect the same fields, run the
//! shared validation before touching the network, and surface field or
//! global errors after a failed submission.

mod create;
mod edit;

pub use create::CreateForm;
pub use edit::EditModal;

use chrono::NaiveDate;

use crate::error::Error;
use crate::task::{
    validate, FieldErrors, Task, TaskRequest, TaskStatus, DUE_DATE_FIELD, GLOBAL_FIELD,
};

/// Raw field input as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    /// `YYYY-MM-DD`, or empty for no due date
    pub due_date: String,
}

impl TaskFields {
    /// Fields pre-populated from an existing task
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status,
            due_date: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }

    /// Validate the input and build the request to submit.
    ///
    /// Title and description are trimmed; an empty description or due date
    /// is sent as absent.
    pub fn to_request(&self) -> std::result::Result<TaskRequest, FieldErrors> {
        let mut errors = validate(&self.title, &self.description);

        let due_date = match self.due_date.trim() {
            "" => None,
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.insert(DUE_DATE_FIELD, "Due date must be a date (YYYY-MM-DD)");
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let description = self.description.trim();
        Ok(TaskRequest {
            title: self.title.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            status: Some(self.status),
            due_date,
        })
    }
}

/// Errors to show after the store rejected a submission
fn submission_errors(error: &Error) -> FieldErrors {
    match error.field_errors() {
        Some(field_errors) if !field_errors.is_empty() => field_errors.clone(),
        _ => {
            let mut errors = FieldErrors::new();
            errors.insert(GLOBAL_FIELD, error.to_string());
            errors
        }
    }
}
