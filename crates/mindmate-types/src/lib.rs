//! Shared domain types for MindMate.
//!
//! This crate contains the types used across the chat session engine:
//! sessions, messages, crisis assessments, responder wire types,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod crisis;
pub mod error;
pub mod responder;
