//! Unauthenticated liveness endpoints.

use axum::Json;
use serde_json::{json, Value};

/// GET / - Service banner.
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "MindMate API is running",
        "status": "OK",
    }))
}

/// GET /health - Simple health check endpoint (no auth required).
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
