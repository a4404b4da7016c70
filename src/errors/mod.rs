//! Error handling module for the Ecclesia backend.
//!
//! Provides the application error type with mapping to HTTP status codes and response bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Message sent for every 5xx response; details stay in the log.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Message heading the field-level violation list.
pub const VALIDATION_ERROR_MESSAGE: &str = "Validation error";

/// One step in the path to an offending input value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl FieldViolation {
    pub fn new(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Violation on a top-level field.
    pub fn field(name: &str, message: impl Into<String>) -> Self {
        Self::new(vec![name.into()], message)
    }

    /// Name of the top-level field this violation refers to, if any.
    pub fn field_name(&self) -> Option<&str> {
        match self.path.first() {
            Some(PathSegment::Key(name)) => Some(name.as_str()),
            _ => None,
        }
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Input failed schema validation
    Validation(Vec<FieldViolation>),
    /// Request body could not be read as JSON
    BadRequest(String),
    /// Duplicate unique key on creation
    Conflict(String),
    /// No route or resource at this path
    NotFound(String),
    /// Storage backend failure
    Database(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation(_) => VALIDATION_ERROR_MESSAGE.to_string(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Conflict(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Database(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
        }
    }

    /// Whether the failure is on our side rather than the caller's.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation(violations) => {
                write!(
                    f,
                    "{} ({} violation(s))",
                    VALIDATION_ERROR_MESSAGE,
                    violations.len()
                )
            }
            other => write!(f, "{}", other.message()),
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::Conflict(format!("Duplicate key: {}", db_err.message()));
            }
        }
        tracing::error!("Database error: {:?}", err);
        AppError::Database(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Internal(format!("JSON error: {}", err))
    }
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldViolation>>,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        match error {
            AppError::Validation(violations) => Self {
                message: VALIDATION_ERROR_MESSAGE.to_string(),
                errors: Some(violations.clone()),
            },
            err if err.is_server_error() => Self {
                message: INTERNAL_ERROR_MESSAGE.to_string(),
                errors: None,
            },
            err => Self {
                message: err.message(),
                errors: None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_body_keeps_violations_verbatim() {
        let err = AppError::Validation(vec![
            FieldViolation::field("email", "Invalid email"),
            FieldViolation::new(
                vec!["volunteerAreas".into(), PathSegment::Index(1)],
                "Expected string, received number",
            ),
        ]);
        let body = serde_json::to_value(ErrorResponse::new(&err)).unwrap();

        assert_eq!(body["message"], "Validation error");
        assert_eq!(body["errors"][0]["path"], serde_json::json!(["email"]));
        assert_eq!(body["errors"][0]["message"], "Invalid email");
        assert_eq!(body["errors"][1]["path"], serde_json::json!(["volunteerAreas", 1]));
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Database("Database error: unable to open file".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::to_value(ErrorResponse::new(&err)).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "Internal server error" }));
    }

    #[test]
    fn test_not_found_keeps_message() {
        let err = AppError::NotFound("Not found".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        let body = serde_json::to_value(ErrorResponse::new(&err)).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "Not found" }));
    }

    #[test]
    fn test_conflict_is_client_error() {
        let err = AppError::Conflict("Username alice already exists".to_string());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(!err.is_server_error());
        assert_eq!(ErrorResponse::new(&err).message, "Username alice already exists");
    }
}
