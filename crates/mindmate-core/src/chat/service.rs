//! Chat service orchestrating sessions, crisis screening, and AI replies.
//!
//! ChatService coordinates the session and message repositories, the risk
//! classifier, and the responder. Every message is screened before the
//! responder is called; a crisis locks the session and short-circuits the
//! exchange with a safety message instead of an AI reply.

use std::sync::Arc;

use chrono::Utc;
use mindmate_types::chat::{
    clamp_title, ChatMessage, ChatSession, MessageExchange, Pseudonym, Sender, CRISIS_RISK_SCORE,
    GREETING_MESSAGE,
};
use mindmate_types::error::ChatError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::history::load_history;
use super::repository::{MessageRepository, SessionRepository};
use super::state::{SessionEvent, SessionStateExt, SessionStateMachine};
use super::title::derive_title;
use crate::crisis::RiskClassifier;
use crate::responder::Responder;

/// Orchestrates the chat session lifecycle and message exchange.
///
/// Generic over the repository ports and the responder so mindmate-core
/// never depends on mindmate-infra.
pub struct ChatService<S: SessionRepository, M: MessageRepository, R: Responder> {
    sessions: S,
    messages: M,
    responder: R,
    classifier: Arc<dyn RiskClassifier>,
    history_limit: usize,
}

impl<S: SessionRepository, M: MessageRepository, R: Responder> ChatService<S, M, R> {
    pub fn new(
        sessions: S,
        messages: M,
        responder: R,
        classifier: Arc<dyn RiskClassifier>,
        history_limit: usize,
    ) -> Self {
        Self {
            sessions,
            messages,
            responder,
            classifier,
            history_limit: history_limit.max(1),
        }
    }

    // --- Session lifecycle ---

    /// Create an Active session and store the system greeting as its first message.
    pub async fn start_session(
        &self,
        owner: &Pseudonym,
        title: Option<&str>,
    ) -> Result<ChatSession, ChatError> {
        let session = ChatSession::new(owner.clone(), title);
        let session = self.sessions.create_session(&session).await?;

        let greeting = ChatMessage::new(session.id, Sender::System, GREETING_MESSAGE);
        self.messages.save_message(&greeting).await?;

        info!(session_id = %session.id, "Chat session started");
        Ok(session)
    }

    /// All sessions owned by `owner`, most recently active first.
    pub async fn list_sessions(&self, owner: &Pseudonym) -> Result<Vec<ChatSession>, ChatError> {
        Ok(self.sessions.list_sessions(owner).await?)
    }

    /// All messages of an owned session in chronological order.
    pub async fn get_messages(
        &self,
        owner: &Pseudonym,
        session_id: &Uuid,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        self.load_owned(owner, session_id).await?;
        Ok(self.messages.get_messages(session_id).await?)
    }

    /// Screen a user message, then either lock the session or fetch an AI reply.
    ///
    /// Locked and closed sessions are refused before screening and nothing is
    /// stored. The responder is never called for a crisis message.
    #[tracing::instrument(name = "chat.send_message", skip_all, fields(session_id = %session_id))]
    pub async fn send_message(
        &self,
        owner: &Pseudonym,
        session_id: &Uuid,
        content: &str,
    ) -> Result<MessageExchange, ChatError> {
        let session = self.load_owned(owner, session_id).await?;
        SessionStateMachine::ensure_can_send(session.status)?;

        if content.trim().is_empty() {
            return Err(ChatError::Validation(
                "message content is required".to_string(),
            ));
        }

        let assessment = self.classifier.assess(content);
        if assessment.is_crisis {
            let safety_message = assessment.safety_message.unwrap_or_default();
            warn!(
                session_id = %session.id,
                matched_keyword = assessment.matched_keyword.as_deref().unwrap_or_default(),
                "Crisis language detected, locking session"
            );
            return self.lock_for_crisis(session, content, safety_message).await;
        }

        let user_message = ChatMessage::new(session.id, Sender::User, content);
        self.messages.save_message(&user_message).await?;

        let title = session.has_default_title().then(|| derive_title(content));
        self.sessions
            .touch(&session.id, user_message.created_at, title.as_deref())
            .await?;

        let history = load_history(&self.messages, &session.id, self.history_limit).await?;
        debug!(history_len = history.len(), "Requesting AI reply");
        let reply = self.responder.respond(content, history).await;

        let ai_message = ChatMessage::new(session.id, Sender::Ai, reply);
        self.messages.save_message(&ai_message).await?;

        Ok(MessageExchange {
            user_message,
            ai_message,
            is_locked: false,
        })
    }

    /// Clear a crisis lock. Unlocking an Active session changes nothing.
    pub async fn unlock_session(
        &self,
        owner: &Pseudonym,
        session_id: &Uuid,
    ) -> Result<ChatSession, ChatError> {
        let mut session = self.load_owned(owner, session_id).await?;
        let change = SessionStateMachine::status_change(
            session.status,
            SessionEvent::OwnerUnlock,
            Utc::now(),
        )?;

        if change.from == change.to {
            return Ok(session);
        }

        if self.sessions.transition_status(&session.id, &change).await? {
            session.apply_change(&change);
            info!(session_id = %session.id, "Chat session unlocked");
            return Ok(session);
        }

        // Status moved underneath us; report whatever is stored now
        self.load_owned(owner, session_id).await
    }

    /// Delete an owned session and all of its messages.
    pub async fn delete_session(
        &self,
        owner: &Pseudonym,
        session_id: &Uuid,
    ) -> Result<(), ChatError> {
        self.load_owned(owner, session_id).await?;

        let removed = self.messages.delete_messages(session_id).await?;
        self.sessions.delete_session(session_id).await?;

        info!(session_id = %session_id, messages = removed, "Chat session deleted");
        Ok(())
    }

    /// Set a new title on an owned session. A missing or blank title leaves it unchanged.
    pub async fn rename_session(
        &self,
        owner: &Pseudonym,
        session_id: &Uuid,
        title: Option<&str>,
    ) -> Result<ChatSession, ChatError> {
        let mut session = self.load_owned(owner, session_id).await?;

        let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(session);
        };

        let title = clamp_title(title);
        self.sessions.set_title(&session.id, &title).await?;
        session.title = title;
        Ok(session)
    }

    // --- Internals ---

    /// Load a session and check it belongs to `owner`.
    async fn load_owned(
        &self,
        owner: &Pseudonym,
        session_id: &Uuid,
    ) -> Result<ChatSession, ChatError> {
        let session = self
            .sessions
            .get_session(session_id)
            .await?
            .ok_or(ChatError::NotFound)?;

        if !session.is_owned_by(owner) {
            return Err(ChatError::Unauthorized);
        }
        Ok(session)
    }

    async fn lock_for_crisis(
        &self,
        mut session: ChatSession,
        content: &str,
        safety_message: String,
    ) -> Result<MessageExchange, ChatError> {
        let user_message = ChatMessage::new(session.id, Sender::User, content)
            .with_risk_score(CRISIS_RISK_SCORE);

        let change = SessionStateMachine::status_change(
            session.status,
            SessionEvent::CrisisDetected,
            user_message.created_at,
        )?;

        // Another request locked or closed the session after our guard check
        if !self.sessions.transition_status(&session.id, &change).await? {
            return Err(ChatError::SessionLocked);
        }
        session.apply_change(&change);

        self.messages.save_message(&user_message).await?;
        let safety = ChatMessage::new(session.id, Sender::System, safety_message);
        self.messages.save_message(&safety).await?;

        info!(session_id = %session.id, "Chat session locked");
        Ok(MessageExchange {
            user_message,
            ai_message: safety,
            is_locked: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::repository::StatusChange;
    use crate::crisis::detector::KeywordCrisisDetector;
    use chrono::DateTime;
    use mindmate_types::chat::{SessionStatus, DEFAULT_SESSION_TITLE};
    use mindmate_types::error::RepositoryError;
    use mindmate_types::responder::{HistoryRole, HistoryTurn};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // --- Mock repositories ---

    #[derive(Default)]
    struct MockSessionRepo {
        sessions: Mutex<Vec<ChatSession>>,
    }

    impl MockSessionRepo {
        fn stored(&self, id: &Uuid) -> Option<ChatSession> {
            self.sessions.lock().unwrap().iter().find(|s| &s.id == id).cloned()
        }

        fn force_status(&self, id: &Uuid, status: SessionStatus) {
            let mut sessions = self.sessions.lock().unwrap();
            if let Some(s) = sessions.iter_mut().find(|s| &s.id == id) {
                s.status = status;
            }
        }
    }

    impl SessionRepository for MockSessionRepo {
        async fn create_session(&self, session: &ChatSession) -> Result<ChatSession, RepositoryError> {
            self.sessions.lock().unwrap().push(session.clone());
            Ok(session.clone())
        }

        async fn get_session(&self, session_id: &Uuid) -> Result<Option<ChatSession>, RepositoryError> {
            Ok(self.stored(session_id))
        }

        async fn list_sessions(&self, owner: &Pseudonym) -> Result<Vec<ChatSession>, RepositoryError> {
            let mut owned: Vec<ChatSession> = self
                .sessions
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.is_owned_by(owner))
                .cloned()
                .collect();
            owned.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
            Ok(owned)
        }

        async fn set_title(&self, session_id: &Uuid, title: &str) -> Result<(), RepositoryError> {
            let mut sessions = self.sessions.lock().unwrap();
            let s = sessions
                .iter_mut()
                .find(|s| &s.id == session_id)
                .ok_or(RepositoryError::NotFound)?;
            s.title = title.to_string();
            Ok(())
        }

        async fn touch(
            &self,
            session_id: &Uuid,
            last_message_at: DateTime<Utc>,
            title: Option<&str>,
        ) -> Result<(), RepositoryError> {
            let mut sessions = self.sessions.lock().unwrap();
            let s = sessions
                .iter_mut()
                .find(|s| &s.id == session_id)
                .ok_or(RepositoryError::NotFound)?;
            s.last_message_at = last_message_at;
            if let Some(title) = title {
                s.title = title.to_string();
            }
            Ok(())
        }

        async fn transition_status(
            &self,
            session_id: &Uuid,
            change: &StatusChange,
        ) -> Result<bool, RepositoryError> {
            let mut sessions = self.sessions.lock().unwrap();
            match sessions
                .iter_mut()
                .find(|s| &s.id == session_id && s.status == change.from)
            {
                Some(s) => {
                    s.apply_change(change);
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete_session(&self, session_id: &Uuid) -> Result<(), RepositoryError> {
            self.sessions.lock().unwrap().retain(|s| &s.id != session_id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockMessageRepo {
        messages: Mutex<Vec<ChatMessage>>,
    }

    impl MockMessageRepo {
        fn count(&self, session_id: &Uuid) -> usize {
            self.messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| &m.session_id == session_id)
                .count()
        }
    }

    impl MessageRepository for MockMessageRepo {
        async fn save_message(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
            self.messages.lock().unwrap().push(message.clone());
            Ok(())
        }

        async fn get_messages(&self, session_id: &Uuid) -> Result<Vec<ChatMessage>, RepositoryError> {
            Ok(self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| &m.session_id == session_id)
                .cloned()
                .collect())
        }

        async fn get_recent_messages(
            &self,
            session_id: &Uuid,
            limit: usize,
        ) -> Result<Vec<ChatMessage>, RepositoryError> {
            let mut all = self.get_messages(session_id).await?;
            all.reverse();
            all.truncate(limit);
            Ok(all)
        }

        async fn delete_messages(&self, session_id: &Uuid) -> Result<u64, RepositoryError> {
            let mut messages = self.messages.lock().unwrap();
            let before = messages.len();
            messages.retain(|m| &m.session_id != session_id);
            Ok((before - messages.len()) as u64)
        }
    }

    // --- Mock responder ---

    #[derive(Default)]
    struct CountingResponder {
        calls: AtomicUsize,
        last_history: Mutex<Vec<HistoryTurn>>,
    }

    impl Responder for CountingResponder {
        async fn respond(&self, message: &str, history: Vec<HistoryTurn>) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_history.lock().unwrap() = history;
            format!("echo: {message}")
        }
    }

    type TestService = ChatService<MockSessionRepo, MockMessageRepo, CountingResponder>;

    fn service() -> TestService {
        ChatService::new(
            MockSessionRepo::default(),
            MockMessageRepo::default(),
            CountingResponder::default(),
            Arc::new(KeywordCrisisDetector::default()),
            10,
        )
    }

    fn owner() -> Pseudonym {
        Pseudonym::from("anon-owner")
    }

    fn stranger() -> Pseudonym {
        Pseudonym::from("anon-stranger")
    }

    fn responder_calls(svc: &TestService) -> usize {
        svc.responder.calls.load(Ordering::SeqCst)
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_start_session_stores_greeting() {
        let svc = service();
        let session = svc.start_session(&owner(), None).await.unwrap();

        assert_eq!(session.status, SessionStatus::Active);
        assert_eq!(session.title, DEFAULT_SESSION_TITLE);

        let messages = svc.get_messages(&owner(), &session.id).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, Sender::System);
        assert_eq!(messages[0].content, GREETING_MESSAGE);
    }

    #[tokio::test]
    async fn test_start_session_with_title() {
        let svc = service();
        let session = svc.start_session(&owner(), Some("Exam stress")).await.unwrap();
        assert_eq!(session.title, "Exam stress");
    }

    #[tokio::test]
    async fn test_list_sessions_only_owned() {
        let svc = service();
        svc.start_session(&owner(), Some("mine")).await.unwrap();
        svc.start_session(&stranger(), Some("theirs")).await.unwrap();

        let listed = svc.list_sessions(&owner()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "mine");
    }

    #[tokio::test]
    async fn test_normal_message_gets_ai_reply() {
        let svc = service();
        let session = svc.start_session(&owner(), None).await.unwrap();

        let exchange = svc
            .send_message(&owner(), &session.id, "I had a rough day")
            .await
            .unwrap();

        assert!(!exchange.is_locked);
        assert_eq!(exchange.user_message.sender, Sender::User);
        assert_eq!(exchange.user_message.risk_score, 0);
        assert_eq!(exchange.ai_message.sender, Sender::Ai);
        assert_eq!(exchange.ai_message.content, "echo: I had a rough day");
        assert_eq!(responder_calls(&svc), 1);

        let stored = svc.sessions.stored(&session.id).unwrap();
        assert_eq!(stored.status, SessionStatus::Active);
        assert!(!stored.crisis_detected);
        assert_eq!(stored.last_message_at, exchange.user_message.created_at);

        let messages = svc.get_messages(&owner(), &session.id).await.unwrap();
        let senders: Vec<Sender> = messages.iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::System, Sender::User, Sender::Ai]);
    }

    #[tokio::test]
    async fn test_crisis_message_locks_session_without_calling_responder() {
        let svc = service();
        let session = svc.start_session(&owner(), None).await.unwrap();

        let exchange = svc
            .send_message(&owner(), &session.id, "I want to END IT ALL tonight")
            .await
            .unwrap();

        assert!(exchange.is_locked);
        assert_eq!(exchange.user_message.risk_score, CRISIS_RISK_SCORE);
        assert_eq!(exchange.ai_message.sender, Sender::System);
        assert!(exchange.ai_message.content.contains("112"));
        assert_eq!(responder_calls(&svc), 0);

        let stored = svc.sessions.stored(&session.id).unwrap();
        assert_eq!(stored.status, SessionStatus::Locked);
        assert!(stored.crisis_detected);
        assert_eq!(stored.last_message_at, exchange.user_message.created_at);
        // Crisis text never names the session
        assert_eq!(stored.title, DEFAULT_SESSION_TITLE);
    }

    #[tokio::test]
    async fn test_locked_session_refuses_messages_and_stores_nothing() {
        let svc = service();
        let session = svc.start_session(&owner(), None).await.unwrap();
        svc.send_message(&owner(), &session.id, "suicide").await.unwrap();
        let count_before = svc.messages.count(&session.id);

        for text in ["hello again", "I want to die", ""] {
            let err = svc.send_message(&owner(), &session.id, text).await.unwrap_err();
            assert!(matches!(err, ChatError::SessionLocked), "got {err:?}");
        }

        assert_eq!(svc.messages.count(&session.id), count_before);
        assert_eq!(responder_calls(&svc), 0);
    }

    #[tokio::test]
    async fn test_closed_session_refuses_messages() {
        let svc = service();
        let session = svc.start_session(&owner(), None).await.unwrap();
        svc.sessions.force_status(&session.id, SessionStatus::Archived);

        let err = svc.send_message(&owner(), &session.id, "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::SessionClosed(SessionStatus::Archived)));
        assert_eq!(svc.messages.count(&session.id), 1);
    }

    #[tokio::test]
    async fn test_lost_lock_race_reports_locked_and_stores_nothing() {
        let svc = service();
        let session = svc.start_session(&owner(), None).await.unwrap();

        // Another request locked the session between our read and our update
        let stale = svc.sessions.stored(&session.id).unwrap();
        svc.sessions.force_status(&session.id, SessionStatus::Locked);

        let err = svc
            .lock_for_crisis(stale, "want to die", "help".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::SessionLocked));
        assert_eq!(svc.messages.count(&session.id), 1);
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let svc = service();
        let session = svc.start_session(&owner(), None).await.unwrap();

        let err = svc.send_message(&owner(), &session.id, "   ").await.unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));
        assert_eq!(svc.messages.count(&session.id), 1);
        assert_eq!(responder_calls(&svc), 0);
    }

    #[tokio::test]
    async fn test_unlock_reactivates_and_clears_flag() {
        let svc = service();
        let session = svc.start_session(&owner(), None).await.unwrap();
        svc.send_message(&owner(), &session.id, "hurt myself").await.unwrap();

        let unlocked = svc.unlock_session(&owner(), &session.id).await.unwrap();
        assert_eq!(unlocked.status, SessionStatus::Active);
        assert!(!unlocked.crisis_detected);

        let stored = svc.sessions.stored(&session.id).unwrap();
        assert_eq!(stored, unlocked);

        // Messages flow again after unlock
        let exchange = svc.send_message(&owner(), &session.id, "thanks").await.unwrap();
        assert!(!exchange.is_locked);
    }

    #[tokio::test]
    async fn test_unlock_active_session_is_noop() {
        let svc = service();
        let session = svc.start_session(&owner(), None).await.unwrap();

        let first = svc.unlock_session(&owner(), &session.id).await.unwrap();
        let second = svc.unlock_session(&owner(), &session.id).await.unwrap();
        assert_eq!(first, session);
        assert_eq!(second, session);
    }

    #[tokio::test]
    async fn test_unlock_closed_session_is_invalid() {
        let svc = service();
        let session = svc.start_session(&owner(), None).await.unwrap();
        svc.sessions.force_status(&session.id, SessionStatus::Completed);

        let err = svc.unlock_session(&owner(), &session.id).await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_owner_mismatch_is_unauthorized_and_missing_is_not_found() {
        let svc = service();
        let session = svc.start_session(&owner(), None).await.unwrap();
        let missing = Uuid::now_v7();

        assert!(matches!(
            svc.get_messages(&stranger(), &session.id).await,
            Err(ChatError::Unauthorized)
        ));
        assert!(matches!(
            svc.send_message(&stranger(), &session.id, "hi").await,
            Err(ChatError::Unauthorized)
        ));
        assert!(matches!(
            svc.unlock_session(&stranger(), &session.id).await,
            Err(ChatError::Unauthorized)
        ));
        assert!(matches!(
            svc.delete_session(&stranger(), &session.id).await,
            Err(ChatError::Unauthorized)
        ));
        assert!(matches!(
            svc.rename_session(&stranger(), &session.id, Some("x")).await,
            Err(ChatError::Unauthorized)
        ));

        assert!(matches!(
            svc.get_messages(&owner(), &missing).await,
            Err(ChatError::NotFound)
        ));
        assert!(matches!(
            svc.send_message(&owner(), &missing, "hi").await,
            Err(ChatError::NotFound)
        ));
        assert!(matches!(
            svc.unlock_session(&owner(), &missing).await,
            Err(ChatError::NotFound)
        ));
        assert!(matches!(
            svc.delete_session(&owner(), &missing).await,
            Err(ChatError::NotFound)
        ));
        assert!(matches!(
            svc.rename_session(&owner(), &missing, Some("Renamed")).await,
            Err(ChatError::NotFound)
        ));
        // A blank title is only a no-op for sessions that exist
        assert!(matches!(
            svc.rename_session(&owner(), &missing, None).await,
            Err(ChatError::NotFound)
        ));

        // The stranger's attempts changed nothing
        assert_eq!(svc.messages.count(&session.id), 1);
        assert!(svc.sessions.stored(&session.id).is_some());
    }

    #[tokio::test]
    async fn test_delete_removes_session_and_messages() {
        let svc = service();
        let session = svc.start_session(&owner(), None).await.unwrap();
        svc.send_message(&owner(), &session.id, "hello").await.unwrap();

        svc.delete_session(&owner(), &session.id).await.unwrap();

        assert_eq!(svc.messages.count(&session.id), 0);
        assert!(matches!(
            svc.get_messages(&owner(), &session.id).await,
            Err(ChatError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_locked_session_allowed() {
        let svc = service();
        let session = svc.start_session(&owner(), None).await.unwrap();
        svc.send_message(&owner(), &session.id, "better off dead").await.unwrap();

        svc.delete_session(&owner(), &session.id).await.unwrap();
        assert!(svc.sessions.stored(&session.id).is_none());
    }

    #[tokio::test]
    async fn test_first_message_derives_title() {
        let svc = service();
        let session = svc.start_session(&owner(), None).await.unwrap();
        let long = "x".repeat(80);

        svc.send_message(&owner(), &session.id, &long).await.unwrap();

        let stored = svc.sessions.stored(&session.id).unwrap();
        assert_eq!(stored.title, format!("{}...", "x".repeat(50)));

        // Second message does not rename again
        svc.send_message(&owner(), &session.id, "short").await.unwrap();
        let stored = svc.sessions.stored(&session.id).unwrap();
        assert_eq!(stored.title, format!("{}...", "x".repeat(50)));
    }

    #[tokio::test]
    async fn test_short_first_message_becomes_title_verbatim() {
        let svc = service();
        let session = svc.start_session(&owner(), None).await.unwrap();
        svc.send_message(&owner(), &session.id, "Can't sleep").await.unwrap();
        assert_eq!(svc.sessions.stored(&session.id).unwrap().title, "Can't sleep");
    }

    #[tokio::test]
    async fn test_custom_title_is_never_replaced() {
        let svc = service();
        let session = svc.start_session(&owner(), Some("Work")).await.unwrap();
        svc.send_message(&owner(), &session.id, "my manager again").await.unwrap();
        assert_eq!(svc.sessions.stored(&session.id).unwrap().title, "Work");
    }

    #[tokio::test]
    async fn test_rename_session() {
        let svc = service();
        let session = svc.start_session(&owner(), None).await.unwrap();

        let renamed = svc
            .rename_session(&owner(), &session.id, Some("  Evening check-in "))
            .await
            .unwrap();
        assert_eq!(renamed.title, "Evening check-in");
        assert_eq!(svc.sessions.stored(&session.id).unwrap().title, "Evening check-in");

        let unchanged = svc.rename_session(&owner(), &session.id, None).await.unwrap();
        assert_eq!(unchanged.title, "Evening check-in");
        let unchanged = svc.rename_session(&owner(), &session.id, Some(" ")).await.unwrap();
        assert_eq!(unchanged.title, "Evening check-in");
    }

    #[tokio::test]
    async fn test_rename_allowed_while_locked() {
        let svc = service();
        let session = svc.start_session(&owner(), None).await.unwrap();
        svc.send_message(&owner(), &session.id, "no reason to live").await.unwrap();

        let renamed = svc.rename_session(&owner(), &session.id, Some("Hard night")).await.unwrap();
        assert_eq!(renamed.title, "Hard night");
        assert_eq!(renamed.status, SessionStatus::Locked);
    }

    #[tokio::test]
    async fn test_history_is_last_ten_chronological() {
        let svc = service();
        let session = svc.start_session(&owner(), None).await.unwrap();
        for i in 0..7 {
            svc.send_message(&owner(), &session.id, &format!("msg {i}")).await.unwrap();
        }
        // 1 greeting + 14 stored before the 8th call stores its user message
        svc.send_message(&owner(), &session.id, "latest").await.unwrap();

        let history = svc.responder.last_history.lock().unwrap().clone();
        assert_eq!(history.len(), 10);

        let stored = svc.get_messages(&owner(), &session.id).await.unwrap();
        // The 10 most recent at call time exclude the final AI reply
        let expected: Vec<String> = stored[stored.len() - 11..stored.len() - 1]
            .iter()
            .map(|m| m.content.clone())
            .collect();
        let actual: Vec<String> = history.iter().map(|t| t.content.clone()).collect();
        assert_eq!(actual, expected);

        let last = history.last().unwrap();
        assert_eq!(last.role, HistoryRole::User);
        assert_eq!(last.content, "latest");
        assert_eq!(history[history.len() - 2].role, HistoryRole::Assistant);
    }
}
