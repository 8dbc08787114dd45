//! Span and event attribute names used across MindMate.
//!
//! Kept in one place so log queries and OpenTelemetry dashboards can rely on
//! stable keys. Message text is never recorded under any of these names.

/// Chat session id (UUID).
pub const SESSION_ID: &str = "mindmate.session.id";

/// Session status after the operation (`active`, `locked`, ...).
pub const SESSION_STATUS: &str = "mindmate.session.status";

/// Tracer name registered with OpenTelemetry.
pub const TRACER_NAME: &str = "mindmate";
