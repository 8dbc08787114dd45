//! Session state machine.
//!
//! Legal transitions:
//!
//! | From     | Event           | To     |
//! |----------|-----------------|--------|
//! | Active   | CrisisDetected  | Locked |
//! | Locked   | OwnerUnlock     | Active |
//! | Active   | OwnerUnlock     | Active (no-op) |
//!
//! Archived and Completed are reserved for future lifecycle operations and
//! accept neither event. Deletion is allowed from any state and is not
//! modelled as a transition.
//!
//! `SessionStateMachine` is stateless (all logic in associated functions);
//! `SessionStateExt` applies a transition to an in-memory `ChatSession`.

use chrono::{DateTime, Utc};
use mindmate_types::chat::{ChatSession, SessionStatus};
use mindmate_types::error::ChatError;

use std::fmt;

use super::repository::StatusChange;

/// Events that can move a session between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The crisis detector flagged a message sent to the session.
    CrisisDetected,
    /// The owner explicitly asked to unlock the session.
    OwnerUnlock,
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::CrisisDetected => write!(f, "crisis_detected"),
            SessionEvent::OwnerUnlock => write!(f, "unlock"),
        }
    }
}

pub struct SessionStateMachine;

impl SessionStateMachine {
    /// Status reached by applying `event` in `from`.
    pub fn next(from: SessionStatus, event: SessionEvent) -> Result<SessionStatus, ChatError> {
        match (from, event) {
            (SessionStatus::Active, SessionEvent::CrisisDetected) => Ok(SessionStatus::Locked),
            (SessionStatus::Locked, SessionEvent::OwnerUnlock) => Ok(SessionStatus::Active),
            (SessionStatus::Active, SessionEvent::OwnerUnlock) => Ok(SessionStatus::Active),
            (SessionStatus::Locked, SessionEvent::CrisisDetected) => Err(ChatError::SessionLocked),
            (from, event) => Err(ChatError::InvalidTransition {
                from,
                event: event.to_string(),
            }),
        }
    }

    /// Whether a session in `status` may receive a new message.
    ///
    /// Locked sessions are refused before any crisis check runs.
    pub fn ensure_can_send(status: SessionStatus) -> Result<(), ChatError> {
        match status {
            SessionStatus::Active => Ok(()),
            SessionStatus::Locked => Err(ChatError::SessionLocked),
            closed @ (SessionStatus::Archived | SessionStatus::Completed) => {
                Err(ChatError::SessionClosed(closed))
            }
        }
    }

    /// Build the conditional store update for `event` from `from`.
    ///
    /// `crisis_detected` follows the target status: set on lock, cleared
    /// on unlock. `at` is recorded as activity only for crisis locks.
    pub fn status_change(
        from: SessionStatus,
        event: SessionEvent,
        at: DateTime<Utc>,
    ) -> Result<StatusChange, ChatError> {
        let to = Self::next(from, event)?;
        Ok(StatusChange {
            from,
            to,
            crisis_detected: to == SessionStatus::Locked,
            last_message_at: match event {
                SessionEvent::CrisisDetected => Some(at),
                SessionEvent::OwnerUnlock => None,
            },
        })
    }
}

/// Extension trait applying state-machine transitions to a `ChatSession`.
pub trait SessionStateExt {
    /// Apply `change` to the in-memory record after the store accepted it.
    fn apply_change(&mut self, change: &StatusChange);
}

impl SessionStateExt for ChatSession {
    fn apply_change(&mut self, change: &StatusChange) {
        self.status = change.to;
        self.crisis_detected = change.crisis_detected;
        if let Some(at) = change.last_message_at {
            self.last_message_at = at;
        }
    }
}
