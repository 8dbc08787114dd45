use thiserror::Error;

use crate::chat::SessionStatus;

/// Errors from repository operations (used by trait definitions in mindmate-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by chat session operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("session not found")]
    NotFound,

    #[error("not authorized to access this session")]
    Unauthorized,

    #[error("session is locked")]
    SessionLocked,

    #[error("session is {0} and no longer accepts messages")]
    SessionClosed(SessionStatus),

    #[error("cannot apply '{event}' to a session that is {from}")]
    InvalidTransition { from: SessionStatus, event: String },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for ChatError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => ChatError::NotFound,
            other => ChatError::Storage(other.to_string()),
        }
    }
}

/// Errors from a single attempt against the external AI responder.
///
/// These never reach API callers: the resilient responder absorbs them
/// into its fallback reply.
#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("responder timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("responder returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

/// Errors from validating loaded configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
