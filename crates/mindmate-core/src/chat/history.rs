//! Responder history construction.

use mindmate_types::chat::ChatMessage;
use mindmate_types::error::RepositoryError;
use mindmate_types::responder::HistoryTurn;
use uuid::Uuid;

use super::repository::MessageRepository;

/// Turn messages fetched newest-first into chronological, role-tagged history.
pub fn history_from_recent(mut recent: Vec<ChatMessage>) -> Vec<HistoryTurn> {
    recent.reverse();
    recent.iter().map(HistoryTurn::from).collect()
}

/// Load the `limit` most recent messages of a session as responder history.
pub async fn load_history<M: MessageRepository>(
    messages: &M,
    session_id: &Uuid,
    limit: usize,
) -> Result<Vec<HistoryTurn>, RepositoryError> {
    let recent = messages.get_recent_messages(session_id, limit).await?;
    Ok(history_from_recent(recent))
}
