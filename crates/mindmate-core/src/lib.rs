//! Business logic and repository trait definitions for MindMate.
//!
//! This crate defines the "ports" (repository and responder traits) that the
//! infrastructure layer implements, plus the chat session engine itself:
//! crisis detection, the session state machine, the resilient responder
//! client, and the chat service that composes them. It depends only on
//! `mindmate-types` -- never on `mindmate-infra` or any database/IO crate.

pub mod chat;
pub mod crisis;
pub mod responder;
