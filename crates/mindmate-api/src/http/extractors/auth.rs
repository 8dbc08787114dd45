//! Credential extractor resolving a request to its owner pseudonym.
//!
//! Extracts the key from:
//! - `Authorization: Bearer <key>` header
//! - `X-API-Key: <key>` header
//!
//! Keys are SHA-256 hashed and looked up in the `credentials` table, which
//! maps each hash to a pseudonym. Plaintext keys are never stored.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use mindmate_infra::sqlite::pool::DatabasePool;
use mindmate_types::chat::Pseudonym;
use sha2::{Digest, Sha256};
use sqlx::Row;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::state::AppState;

/// Prefix of every issued key, so leaked keys are easy to spot.
pub const KEY_PREFIX: &str = "mm_";

/// The pseudonym of the authenticated caller.
#[derive(Debug, Clone)]
pub struct Owner(pub Pseudonym);

impl FromRequestParts<AppState> for Owner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key = extract_api_key(parts)?;
        let key_hash = hash_api_key(&key);

        let row = sqlx::query("SELECT id, pseudonym_id FROM credentials WHERE key_hash = ?")
            .bind(&key_hash)
            .fetch_optional(&state.db_pool.reader)
            .await
            .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;

        let Some(row) = row else {
            return Err(AppError::Unauthorized(
                "Invalid credential. Provide a valid key via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header.".to_string(),
            ));
        };

        let id: String = row
            .try_get("id")
            .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;
        let pseudonym: String = row
            .try_get("pseudonym_id")
            .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;

        // Update last_used_at (best effort, don't fail the request)
        let now = chrono::Utc::now().to_rfc3339();
        let _ = sqlx::query("UPDATE credentials SET last_used_at = ? WHERE id = ?")
            .bind(&now)
            .bind(&id)
            .execute(&state.db_pool.writer)
            .await;

        Ok(Owner(Pseudonym::new(pseudonym)))
    }
}

/// Extract the key from request headers.
fn extract_api_key(parts: &Parts) -> Result<String, AppError> {
    // Try Authorization: Bearer <key>
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(key) = auth_str.strip_prefix("Bearer ") {
            let key = key.trim();
            if !key.is_empty() {
                return Ok(key.to_string());
            }
        }
    }

    // Try X-API-Key header
    if let Some(key) = parts.headers.get("x-api-key") {
        let key_str = key.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid X-API-Key header encoding".to_string())
        })?;
        let key_str = key_str.trim();
        if !key_str.is_empty() {
            return Ok(key_str.to_string());
        }
    }

    Err(AppError::Unauthorized(
        "Missing credential. Provide via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header.".to_string(),
    ))
}

/// Compute SHA-256 hash of a key (lowercase hex).
pub fn hash_api_key(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{:x}", digest)
}

/// A freshly issued credential. The key is only ever available here.
#[derive(Debug, Clone)]
pub struct IssuedCredential {
    pub key: String,
    pub pseudonym: Pseudonym,
}

/// Mint a new key for `pseudonym` (or a fresh random pseudonym) and store its hash.
pub async fn issue_credential(
    pool: &DatabasePool,
    pseudonym: Option<Pseudonym>,
) -> anyhow::Result<IssuedCredential> {
    let pseudonym =
        pseudonym.unwrap_or_else(|| Pseudonym::new(format!("anon_{}", Uuid::new_v4().simple())));
    let key = format!(
        "{KEY_PREFIX}{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    );

    sqlx::query(
        "INSERT INTO credentials (id, key_hash, pseudonym_id, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(Uuid::now_v7().to_string())
    .bind(hash_api_key(&key))
    .bind(pseudonym.as_str())
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(&pool.writer)
    .await?;

    tracing::info!("Credential issued");
    Ok(IssuedCredential { key, pseudonym })
}
