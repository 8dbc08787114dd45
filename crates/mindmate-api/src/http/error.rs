//! Application error type mapping to HTTP status codes.
//!
//! Error bodies are `{"message": ..., "code": ...}`. Server-side failures
//! get a generic message; the detail only goes to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use mindmate_types::error::ChatError;

/// Refusal text for messages sent to a locked session.
pub const SESSION_LOCKED_MESSAGE: &str =
    "This session is locked due to safety concerns. Please contact emergency services.";

const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat session errors.
    Chat(ChatError),
    /// Missing or unknown credential.
    Unauthorized(String),
    /// Malformed request.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(ChatError::NotFound) => {
                (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", "Session not found".to_string())
            }
            AppError::Chat(ChatError::Unauthorized) => (
                StatusCode::UNAUTHORIZED,
                "NOT_AUTHORIZED",
                "Not authorized to access this session".to_string(),
            ),
            AppError::Chat(ChatError::SessionLocked) => {
                (StatusCode::FORBIDDEN, "SESSION_LOCKED", SESSION_LOCKED_MESSAGE.to_string())
            }
            AppError::Chat(e @ ChatError::SessionClosed(_)) => {
                (StatusCode::FORBIDDEN, "SESSION_CLOSED", e.to_string())
            }
            AppError::Chat(e @ ChatError::InvalidTransition { .. }) => {
                (StatusCode::FORBIDDEN, "INVALID_TRANSITION", e.to_string())
            }
            AppError::Chat(ChatError::Validation(msg)) | AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Chat(ChatError::Storage(_)) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                SERVER_ERROR_MESSAGE.to_string(),
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            match &self {
                AppError::Chat(ChatError::Storage(detail)) | AppError::Internal(detail) => {
                    tracing::error!(code, error = %detail, "Request failed");
                }
                other => tracing::error!(code, error = ?other, "Request failed"),
            }
        }

        (status, Json(json!({ "message": message, "code": code }))).into_response()
    }
}
