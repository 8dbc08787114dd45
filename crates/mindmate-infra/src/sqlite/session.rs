//! SQLite session repository implementation.
//!
//! Implements `SessionRepository` from `mindmate-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct, reads on the reader
//! pool and every write on the single writer connection.

use chrono::{DateTime, Utc};
use mindmate_core::chat::repository::{SessionRepository, StatusChange};
use mindmate_types::chat::{ChatSession, Pseudonym, SessionStatus};
use mindmate_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `SessionRepository`.
pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatSessionRow {
    id: String,
    pseudonym_id: String,
    title: String,
    status: String,
    crisis_detected: bool,
    summary: Option<String>,
    started_at: String,
    last_message_at: String,
}

impl ChatSessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            pseudonym_id: row.try_get("pseudonym_id")?,
            title: row.try_get("title")?,
            status: row.try_get("status")?,
            crisis_detected: row.try_get("crisis_detected")?,
            summary: row.try_get("summary")?,
            started_at: row.try_get("started_at")?,
            last_message_at: row.try_get("last_message_at")?,
        })
    }

    fn into_session(self) -> Result<ChatSession, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid session id: {e}")))?;
        let status: SessionStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ChatSession {
            id,
            pseudonym_id: Pseudonym::new(self.pseudonym_id),
            title: self.title,
            status,
            crisis_detected: self.crisis_detected,
            summary: self.summary,
            started_at: parse_datetime(&self.started_at)?,
            last_message_at: parse_datetime(&self.last_message_at)?,
        })
    }
}

fn map_session(row: &sqlx::sqlite::SqliteRow) -> Result<ChatSession, RepositoryError> {
    ChatSessionRow::from_row(row)
        .map_err(query_error)?
        .into_session()
}

// ---------------------------------------------------------------------------
// SessionRepository implementation
// ---------------------------------------------------------------------------

impl SessionRepository for SqliteSessionRepository {
    async fn create_session(&self, session: &ChatSession) -> Result<ChatSession, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO chat_sessions (id, pseudonym_id, title, status, crisis_detected, summary, started_at, last_message_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(session.id.to_string())
        .bind(session.pseudonym_id.as_str())
        .bind(&session.title)
        .bind(session.status.to_string())
        .bind(session.crisis_detected)
        .bind(&session.summary)
        .bind(format_datetime(&session.started_at))
        .bind(format_datetime(&session.last_message_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RepositoryError::Conflict(format!("session {} already exists", session.id))
            }
            other => query_error(other),
        })?;

        Ok(session.clone())
    }

    async fn get_session(&self, session_id: &Uuid) -> Result<Option<ChatSession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.as_ref().map(map_session).transpose()
    }

    async fn list_sessions(&self, owner: &Pseudonym) -> Result<Vec<ChatSession>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_sessions WHERE pseudonym_id = ? ORDER BY last_message_at DESC, id DESC",
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(map_session).collect()
    }

    async fn set_title(&self, session_id: &Uuid, title: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE chat_sessions SET title = ? WHERE id = ?")
            .bind(title)
            .bind(session_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn touch(
        &self,
        session_id: &Uuid,
        last_message_at: DateTime<Utc>,
        title: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE chat_sessions SET last_message_at = ?, title = COALESCE(?, title) WHERE id = ?",
        )
        .bind(format_datetime(&last_message_at))
        .bind(title)
        .bind(session_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn transition_status(
        &self,
        session_id: &Uuid,
        change: &StatusChange,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE chat_sessions
               SET status = ?, crisis_detected = ?, last_message_at = COALESCE(?, last_message_at)
               WHERE id = ? AND status = ?"#,
        )
        .bind(change.to.to_string())
        .bind(change.crisis_detected)
        .bind(change.last_message_at.as_ref().map(format_datetime))
        .bind(session_id.to_string())
        .bind(change.from.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_session(&self, session_id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
