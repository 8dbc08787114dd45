//! Chat session engine.
//!
//! - `repository`: session and message persistence ports
//! - `state`: legal session statuses and transitions
//! - `title`: title derivation from the first user message
//! - `history`: responder history construction
//! - `service`: the orchestrator callers invoke

pub mod history;
pub mod repository;
pub mod service;
pub mod state;
pub mod title;
