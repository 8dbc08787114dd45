//! Session and message repository trait definitions.
//!
//! Both stores are collaborators: they provide atomic single-record writes
//! but no transaction spanning several calls. Status changes therefore go
//! through [`SessionRepository::transition_status`], a conditional update
//! that only applies when the stored status still matches.
//! Follows the same RPITIT pattern as the other ports in this crate.

use chrono::{DateTime, Utc};
use mindmate_types::chat::{ChatMessage, ChatSession, Pseudonym, SessionStatus};
use mindmate_types::error::RepositoryError;
use uuid::Uuid;

/// A conditional status change for [`SessionRepository::transition_status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// Status the session must currently have for the change to apply.
    pub from: SessionStatus,
    pub to: SessionStatus,
    pub crisis_detected: bool,
    /// New `last_message_at`, if the change also records activity.
    pub last_message_at: Option<DateTime<Utc>>,
}

/// Repository trait for chat session persistence.
///
/// Implementations live in mindmate-infra (e.g., `SqliteSessionRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait SessionRepository: Send + Sync {
    /// Create a new chat session.
    fn create_session(
        &self,
        session: &ChatSession,
    ) -> impl std::future::Future<Output = Result<ChatSession, RepositoryError>> + Send;

    /// Get a chat session by its unique ID.
    fn get_session(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ChatSession>, RepositoryError>> + Send;

    /// List sessions owned by a pseudonym, ordered by last_message_at DESC.
    fn list_sessions(
        &self,
        owner: &Pseudonym,
    ) -> impl std::future::Future<Output = Result<Vec<ChatSession>, RepositoryError>> + Send;

    /// Replace the session title.
    fn set_title(
        &self,
        session_id: &Uuid,
        title: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Record new activity: bump last_message_at and optionally retitle.
    ///
    /// Never touches status or crisis_detected.
    fn touch(
        &self,
        session_id: &Uuid,
        last_message_at: DateTime<Utc>,
        title: Option<&str>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Apply `change` only if the stored status equals `change.from`.
    ///
    /// Returns `true` if the session was updated, `false` if its status had
    /// already moved on (or the session no longer exists).
    fn transition_status(
        &self,
        session_id: &Uuid,
        change: &StatusChange,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Delete a session record.
    fn delete_session(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// Repository trait for message persistence.
///
/// Messages are append-only; they are removed only together with their
/// session.
pub trait MessageRepository: Send + Sync {
    /// Save a new message within a session.
    fn save_message(
        &self,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get all messages for a session, ordered by created_at ASC.
    fn get_messages(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Get the `limit` most recent messages, ordered by created_at DESC.
    fn get_recent_messages(
        &self,
        session_id: &Uuid,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Delete every message in a session. Returns how many were removed.
    fn delete_messages(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
