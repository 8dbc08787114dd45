//! Infrastructure layer for MindMate.
//!
//! Contains implementations of the ports defined in `mindmate-core`: SQLite
//! session and message storage, the HTTP transport to the AI responder, and
//! configuration loading from the data directory.

pub mod config;
pub mod filesystem;
pub mod responder;
pub mod sqlite;
