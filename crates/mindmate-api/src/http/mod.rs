//! HTTP/REST API layer for MindMate.
//!
//! Axum-based REST API with chat routes under `/api/chat/`, bearer
//! credential resolution to a pseudonym, and CORS support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
