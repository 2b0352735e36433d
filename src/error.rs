//! Unified application error model and mapping helpers.
//! This module provides a common tagged error enum used across the HTTP
//! handlers, the product store and the bootstrap path, along with a
//! deterministic mapping to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    NotFound { message: String },
    ValidationFailed { message: String },
    StorageError { message: String },
    FileSystemError { message: String },
    Internal { message: String },
}

impl AppError {
    pub fn message(&self) -> &str {
        match self {
            AppError::NotFound { message }
            | AppError::ValidationFailed { message }
            | AppError::StorageError { message }
            | AppError::FileSystemError { message }
            | AppError::Internal { message } => message.as_str(),
        }
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self { AppError::NotFound { message: msg.into() } }
    pub fn validation<S: Into<String>>(msg: S) -> Self { AppError::ValidationFailed { message: msg.into() } }
    pub fn storage<S: Into<String>>(msg: S) -> Self { AppError::StorageError { message: msg.into() } }
    pub fn filesystem<S: Into<String>>(msg: S) -> Self { AppError::FileSystemError { message: msg.into() } }
    pub fn internal<S: Into<String>>(msg: S) -> Self { AppError::Internal { message: msg.into() } }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            AppError::StorageError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::FileSystemError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        // Default mapping: treat as Internal unless classified at the call site
        AppError::Internal { message: err.to_string() }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileSystemError { message: err.to_string() }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.http_status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_mapping() {
        assert_eq!(AppError::not_found("missing").http_status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::validation("bad input").http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::storage("save failed").http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::filesystem("unlink failed").http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::internal("panic").http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn serializes_with_type_tag() {
        let v = serde_json::to_value(AppError::validation("filename required")).unwrap();
        assert_eq!(v["type"], "validation_failed");
        assert_eq!(v["message"], "filename required");
    }

    #[test]
    fn io_errors_map_to_filesystem() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no file found");
        let app: AppError = io.into();
        assert!(matches!(app, AppError::FileSystemError { .. }));
        assert_eq!(app.message(), "no file found");
    }
}
