//! Chat session and message types for MindMate.
//!
//! These types model an anonymous conversation between a user (known only by
//! a pseudonym) and the AI responder: sessions, messages, and the outcome of
//! a message exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Title given to a session until the owner or the first message renames it.
pub const DEFAULT_SESSION_TITLE: &str = "New Conversation";

/// Maximum stored title length, in characters.
pub const MAX_TITLE_CHARS: usize = 100;

/// Risk score attached to a message that tripped the crisis detector.
pub const CRISIS_RISK_SCORE: u8 = 100;

/// Upper bound for [`ChatMessage::risk_score`].
pub const MAX_RISK_SCORE: u8 = 100;

/// System greeting stored as the first message of every new session.
pub const GREETING_MESSAGE: &str =
    "Welcome to MindMate. How are you feeling today? (This is a safe space)";

/// Opaque per-user identifier.
///
/// Sessions reference a pseudonym rather than an account so chat content
/// stays logically decoupled from identity records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pseudonym(pub String);

impl Pseudonym {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pseudonym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Pseudonym {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Lifecycle status of a chat session.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (status IN ('active', 'locked', 'archived', 'completed'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Active,
    Locked,
    Archived,
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Locked => write!(f, "locked"),
            SessionStatus::Archived => write!(f, "archived"),
            SessionStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SessionStatus::Active),
            "locked" => Ok(SessionStatus::Locked),
            "archived" => Ok(SessionStatus::Archived),
            "completed" => Ok(SessionStatus::Completed),
            other => Err(format!("invalid session status: '{other}'")),
        }
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
    System,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Ai => write!(f, "ai"),
            Sender::System => write!(f, "system"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "ai" => Ok(Sender::Ai),
            "system" => Ok(Sender::System),
            other => Err(format!("invalid message sender: '{other}'")),
        }
    }
}

/// A conversation owned by a single pseudonym.
///
/// `crisis_detected` is true exactly while a crisis lock has not been
/// cleared by the owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: Uuid,
    pub pseudonym_id: Pseudonym,
    pub title: String,
    pub status: SessionStatus,
    pub crisis_detected: bool,
    /// Free-form summary of the conversation. Not populated by the engine yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub started_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
}

impl ChatSession {
    /// Build a fresh Active session for `owner`.
    ///
    /// A missing or blank title falls back to [`DEFAULT_SESSION_TITLE`];
    /// longer titles are cut to [`MAX_TITLE_CHARS`].
    pub fn new(owner: Pseudonym, title: Option<&str>) -> Self {
        let now = Utc::now();
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(clamp_title)
            .unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string());

        Self {
            id: Uuid::now_v7(),
            pseudonym_id: owner,
            title,
            status: SessionStatus::Active,
            crisis_detected: false,
            summary: None,
            started_at: now,
            last_message_at: now,
        }
    }

    pub fn is_owned_by(&self, owner: &Pseudonym) -> bool {
        &self.pseudonym_id == owner
    }

    pub fn has_default_title(&self) -> bool {
        self.title == DEFAULT_SESSION_TITLE
    }
}

/// Cut a title down to [`MAX_TITLE_CHARS`] characters.
pub fn clamp_title(title: &str) -> String {
    title.chars().take(MAX_TITLE_CHARS).collect()
}

/// A single message within a chat session.
///
/// Messages are immutable once stored and ordered by `created_at` within
/// their session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub sender: Sender,
    pub content: String,
    /// 0 for ordinary messages, [`CRISIS_RISK_SCORE`] for crisis-flagged ones.
    pub risk_score: u8,
    /// Retrieval context used to produce this message (reserved).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_used: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(session_id: Uuid, sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            sender,
            content: content.into(),
            risk_score: 0,
            context_used: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_risk_score(mut self, risk_score: u8) -> Self {
        self.risk_score = risk_score.min(MAX_RISK_SCORE);
        self
    }
}

/// Result of a successful send-message call.
///
/// On the crisis path `ai_message` is the system safety message and
/// `is_locked` is true.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageExchange {
    pub user_message: ChatMessage,
    pub ai_message: ChatMessage,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_locked: bool,
}
