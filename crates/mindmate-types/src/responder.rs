//! Wire types for the external AI responder.
//!
//! Outbound: `POST {base_url}` with `{"message": ..., "history": [{role, content}]}`.
//! Inbound: a JSON object carrying the reply text under `response`,
//! `message`, or `reply` (first present field wins).

use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, Sender};

use std::fmt;

/// Role of a history turn as seen by the responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    User,
    Assistant,
}

impl fmt::Display for HistoryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryRole::User => write!(f, "user"),
            HistoryRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl From<Sender> for HistoryRole {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User => HistoryRole::User,
            Sender::Ai | Sender::System => HistoryRole::Assistant,
        }
    }
}

/// A prior message passed to the responder for context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: HistoryRole,
    pub content: String,
}

impl From<&ChatMessage> for HistoryTurn {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.sender.into(),
            content: message.content.clone(),
        }
    }
}

/// Request body sent to the responder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponderRequest {
    pub message: String,
    pub history: Vec<HistoryTurn>,
}

/// Response body accepted from the responder.
///
/// Unknown fields are ignored; all known fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponderReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

impl ResponderReply {
    /// The reply text, taking `response`, then `message`, then `reply`.
    pub fn text(&self) -> Option<&str> {
        self.response
            .as_deref()
            .or(self.message.as_deref())
            .or(self.reply.as_deref())
    }
}
