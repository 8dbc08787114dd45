//! AI responder client abstractions.
//!
//! Two layers:
//! - [`ResponderTransport`]: one raw attempt against the external responder.
//!   Implementations live in mindmate-infra (e.g., `HttpResponderTransport`).
//! - [`Responder`]: what the chat service calls. Infallible by contract:
//!   it always yields text the user can read.
//!
//! [`resilient::ResilientResponder`] turns any transport into a responder
//! with per-attempt timeouts, backoff between attempts, and a fixed fallback.

pub mod resilient;
pub mod retry;

use mindmate_types::error::ResponderError;
use mindmate_types::responder::{HistoryTurn, ResponderReply, ResponderRequest};

/// A single call to the external AI responder.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ResponderTransport: Send + Sync {
    fn send(
        &self,
        request: &ResponderRequest,
    ) -> impl std::future::Future<Output = Result<ResponderReply, ResponderError>> + Send;
}

/// Produces the AI reply for a user message.
///
/// Never fails: outages are absorbed into a fallback reply.
pub trait Responder: Send + Sync {
    fn respond(
        &self,
        message: &str,
        history: Vec<HistoryTurn>,
    ) -> impl std::future::Future<Output = String> + Send;
}
