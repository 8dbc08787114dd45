//! HTTP transport to the external AI responder.
//!
//! One call is one `POST {base_url}` with a JSON [`ResponderRequest`] body.
//! Any non-2xx status, connection failure, or unparsable body is an error;
//! retries and the per-attempt timeout belong to `ResilientResponder` in
//! mindmate-core, so the client itself sets no request timeout.

use mindmate_core::responder::ResponderTransport;
use mindmate_types::error::ResponderError;
use mindmate_types::responder::{ResponderReply, ResponderRequest};

/// Longest error body kept in a [`ResponderError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 512;

/// reqwest-backed [`ResponderTransport`].
#[derive(Clone)]
pub struct HttpResponderTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpResponderTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ResponderError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mindmate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ResponderError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Use an existing client (shared connection pool, custom TLS, ...).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl ResponderTransport for HttpResponderTransport {
    async fn send(&self, request: &ResponderRequest) -> Result<ResponderReply, ResponderError> {
        let response = self
            .client
            .post(&self.base_url)
            .json(request)
            .send()
            .await
            .map_err(|e| ResponderError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            return Err(ResponderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<ResponderReply>()
            .await
            .map_err(|e| ResponderError::Deserialization(format!("failed to parse response: {e}")))
    }
}
