//! Observability for MindMate: subscriber setup and shared span attribute names.

pub mod attrs;
pub mod tracing_setup;
