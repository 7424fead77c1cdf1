//! Error types for the task store and structured API error responses.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use std::fmt;

/// Errors raised by the repository and the insight generator.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Missing required field, bad enum value, or an empty update.
    #[error("{message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// No task row matches the identifier.
    #[error("Task not found: {0}")]
    NotFound(i64),

    /// Underlying SQLite failure.
    #[error("storage error: {0}")]
    Store(#[from] rusqlite::Error),

    /// A previous holder of the connection panicked.
    #[error("database connection lock poisoned")]
    LockPoisoned,
}

impl TaskError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
        }
    }

    pub fn missing_field(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }

    pub fn invalid_value(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }

    pub fn no_update_fields() -> Self {
        Self::invalid("No fields to update")
    }

    /// The error code this error maps to on the wire.
    pub fn code(&self) -> ErrorCode {
        match self {
            TaskError::InvalidInput { .. } => ErrorCode::InvalidInput,
            TaskError::NotFound(_) => ErrorCode::NotFound,
            TaskError::Store(_) | TaskError::LockPoisoned => ErrorCode::StoreFailure,
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, TaskError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    NotFound,
    StoreFailure,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::StoreFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structured error body returned by the HTTP API.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        let code = err.code();
        match err {
            TaskError::InvalidInput { message, field } => Self {
                code,
                message,
                field,
            },
            TaskError::NotFound(_) => Self::new(code, "Task not found"),
            // Storage details stay in the log, not in the response.
            other => {
                tracing::error!(error = %other, "Task store failure");
                Self::new(code, "Internal storage error")
            }
        }
    }
}

// Extractor rejections always map to InvalidInput.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(ErrorCode::InvalidInput, rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(ErrorCode::InvalidInput, rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(ErrorCode::InvalidInput, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}
