//! Error types for the core library

use thiserror::Error;

use crate::task::FieldErrors;

/// Fallback shown when a failure carries no usable message at all.
pub const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Error, Debug)]
pub enum Error {
    /// Network failure or an unexpected server response.
    #[error("{message}")]
    Transport {
        message: String,
        /// Top-level `error` string from the response body, if any
        server_message: Option<String>,
    },

    /// The server rejected the request with per-field messages.
    #[error("{}", .server_message.as_deref().unwrap_or("Validation failed"))]
    Validation {
        field_errors: FieldErrors,
        server_message: Option<String>,
    },

    /// The task does not exist on the server.
    #[error("Task not found: {message}")]
    NotFound {
        message: String,
        server_message: Option<String>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a Transport error without a server-supplied message
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            server_message: None,
        }
    }

    /// Create a NotFound error for a task id
    pub fn not_found(id: i64) -> Self {
        Self::NotFound {
            message: id.to_string(),
            server_message: None,
        }
    }

    /// Field-level errors reported by the server, when present
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { field_errors, .. } => Some(field_errors),
            _ => None,
        }
    }

    /// The `error` string the server put in its response body
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Transport { server_message, .. }
            | Self::Validation { server_message, .. }
            | Self::NotFound { server_message, .. } => server_message.as_deref(),
            _ => None,
        }
    }

    /// Render the error for display.
    ///
    /// Field errors win and render as `field: message` lines, then the
    /// server's top-level message, then this error's own message.
    pub fn normalized(&self) -> String {
        if let Some(field_errors) = self.field_errors().filter(|f| !f.is_empty()) {
            return field_errors.to_lines();
        }

        if let Some(server_message) = self.server_message().filter(|m| !m.trim().is_empty()) {
            return server_message.to_string();
        }

        let raw = self.to_string();
        if raw.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            raw
        }
    }
}

/// Free-function form of [`Error::normalized`], for use in `map_err` chains.
pub fn normalize_error(error: &Error) -> String {
    error.normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_take_precedence() {
        let mut field_errors = FieldErrors::new();
        field_errors.insert("title", "Title is required");
        field_errors.insert("description", "Description must be <= 500 characters");

        let error = Error::Validation {
            field_errors,
            server_message: Some("Validation failed".to_string()),
        };

        assert_eq!(
            error.normalized(),
            "description: Description must be <= 500 characters\ntitle: Title is required"
        );
    }

    #[test]
    fn test_server_message_used_without_field_errors() {
        let error = Error::Transport {
            message: "Request failed with status code 500".to_string(),
            server_message: Some("Database unavailable".to_string()),
        };
        assert_eq!(error.normalized(), "Database unavailable");
    }

    #[test]
    fn test_empty_field_errors_fall_through_to_server_message() {
        let error = Error::Validation {
            field_errors: FieldErrors::new(),
            server_message: Some("Bad payload".to_string()),
        };
        assert_eq!(normalize_error(&error), "Bad payload");
    }

    #[test]
    fn test_raw_message_fallback() {
        let error = Error::transport("connection refused");
        assert_eq!(error.normalized(), "connection refused");

        let not_found = Error::not_found(42);
        assert_eq!(not_found.normalized(), "Task not found: 42");
    }

    #[test]
    fn test_unknown_error_fallback() {
        let error = Error::Transport {
            message: "  ".to_string(),
            server_message: Some(String::new()),
        };
        assert_eq!(error.normalized(), UNKNOWN_ERROR);
    }
}
