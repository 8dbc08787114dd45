//! Chat session HTTP handlers.
//!
//! Endpoints (all under `/api/chat`, all require a credential):
//! - POST   /start                 - Start a session
//! - GET    /sessions              - List the caller's sessions
//! - GET    /session/{id}          - Messages of a session
//! - PUT    /session/{id}          - Rename a session
//! - DELETE /session/{id}          - Delete a session and its messages
//! - POST   /session/{id}/message  - Send a message
//! - POST   /session/{id}/unlock   - Clear a crisis lock

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::Instrument;
use uuid::Uuid;

use mindmate_observe::attrs;
use mindmate_types::chat::{ChatMessage, ChatSession, MessageExchange};

use crate::http::error::AppError;
use crate::http::extractors::auth::Owner;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StartSessionRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RenameSessionRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub content: Option<String>,
}

/// Parse a JSON body; an empty body yields the type's default.
///
/// Parsed by hand so malformed bodies get the same error shape as every
/// other failure instead of axum's plain-text rejection.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))
}

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid session id: {s}")))
}

/// POST /api/chat/start - Start a session with an optional title.
pub async fn start_session(
    State(state): State<AppState>,
    Owner(owner): Owner,
    body: Bytes,
) -> Result<(StatusCode, Json<ChatSession>), AppError> {
    let request: StartSessionRequest = parse_body(&body)?;
    let session = state
        .chat_service
        .start_session(&owner, request.title.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/chat/sessions - The caller's sessions, most recently active first.
pub async fn list_sessions(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> Result<Json<Vec<ChatSession>>, AppError> {
    Ok(Json(state.chat_service.list_sessions(&owner).await?))
}

/// GET /api/chat/session/{id} - All messages of a session, oldest first.
pub async fn get_messages(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let session_id = parse_uuid(&id)?;
    Ok(Json(
        state.chat_service.get_messages(&owner, &session_id).await?,
    ))
}

/// PUT /api/chat/session/{id} - Rename a session.
pub async fn rename_session(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ChatSession>, AppError> {
    let session_id = parse_uuid(&id)?;
    let request: RenameSessionRequest = parse_body(&body)?;
    let session = state
        .chat_service
        .rename_session(&owner, &session_id, request.title.as_deref())
        .await?;
    Ok(Json(session))
}

/// DELETE /api/chat/session/{id} - Delete a session and all of its messages.
pub async fn delete_session(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let session_id = parse_uuid(&id)?;
    state.chat_service.delete_session(&owner, &session_id).await?;
    Ok(Json(json!({ "message": "Session deleted successfully" })))
}

/// POST /api/chat/session/{id}/message - Send a message.
///
/// Always 201 on success, including when the responder was unreachable
/// (fallback text) or the message locked the session (`isLocked: true`).
pub async fn send_message(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<MessageExchange>), AppError> {
    let session_id = parse_uuid(&id)?;
    let request: SendMessageRequest = parse_body(&body)?;
    let content = request.content.unwrap_or_default();

    let span = tracing::info_span!("http.send_message", { attrs::SESSION_ID } = id.as_str());
    let exchange = state
        .chat_service
        .send_message(&owner, &session_id, &content)
        .instrument(span)
        .await?;

    if exchange.is_locked {
        tracing::info!({ attrs::SESSION_STATUS } = "locked", "Message exchange ended in lock");
    }
    Ok((StatusCode::CREATED, Json(exchange)))
}

/// POST /api/chat/session/{id}/unlock - Clear a crisis lock.
pub async fn unlock_session(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<Json<ChatSession>, AppError> {
    let session_id = parse_uuid(&id)?;
    let session = state
        .chat_service
        .unlock_session(&owner, &session_id)
        .await?;
    Ok(Json(session))
}
