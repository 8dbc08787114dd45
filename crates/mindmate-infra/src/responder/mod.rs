//! Adapters for the external AI responder.

pub mod http;

pub use http::HttpResponderTransport;
