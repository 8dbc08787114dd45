//! Axum router configuration with middleware.
//!
//! Chat routes are under `/api/chat/`; `/` and `/health` are open.
//! Middleware: CORS, tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let chat_routes = Router::new()
        .route("/start", post(handlers::chat::start_session))
        .route("/sessions", get(handlers::chat::list_sessions))
        .route(
            "/session/{id}",
            get(handlers::chat::get_messages)
                .put(handlers::chat::rename_session)
                .delete(handlers::chat::delete_session),
        )
        .route("/session/{id}/message", post(handlers::chat::send_message))
        .route("/session/{id}/unlock", post(handlers::chat::unlock_session));

    Router::new()
        .nest("/api/chat", chat_routes)
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
