//! Resilient responder: retries, per-attempt timeout, and fallback.
//!
//! Each attempt runs under `tokio::time::timeout`; when it elapses the
//! in-flight transport future is dropped, which cancels the request and
//! releases its connection before the next attempt starts. After the last
//! failed attempt the configured fallback text is returned instead of an
//! error, so callers only ever observe extra latency.

use mindmate_types::config::ResponderConfig;
use mindmate_types::error::ResponderError;
use mindmate_types::responder::{HistoryTurn, ResponderRequest};
use tracing::{debug, error, warn};

use super::retry::RetryPolicy;
use super::{Responder, ResponderTransport};

pub struct ResilientResponder<T: ResponderTransport> {
    transport: T,
    policy: RetryPolicy,
    fallback_message: String,
    empty_reply_message: String,
}

impl<T: ResponderTransport> ResilientResponder<T> {
    pub fn new(
        transport: T,
        policy: RetryPolicy,
        fallback_message: impl Into<String>,
        empty_reply_message: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            policy,
            fallback_message: fallback_message.into(),
            empty_reply_message: empty_reply_message.into(),
        }
    }

    pub fn from_config(transport: T, config: &ResponderConfig) -> Self {
        Self::new(
            transport,
            RetryPolicy::from_config(config),
            config.fallback_message.clone(),
            config.empty_reply_message.clone(),
        )
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run one attempt under the per-attempt timeout.
    async fn attempt(&self, request: &ResponderRequest) -> Result<String, ResponderError> {
        let timeout = self.policy.attempt_timeout;
        let reply = tokio::time::timeout(timeout, self.transport.send(request))
            .await
            .map_err(|_| ResponderError::Timeout {
                after_ms: timeout.as_millis() as u64,
            })??;

        // A blank reply is as useless to the user as a missing one
        Ok(reply
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.empty_reply_message.clone()))
    }
}

impl<T: ResponderTransport> Responder for ResilientResponder<T> {
    #[tracing::instrument(
        name = "responder.respond",
        skip_all,
        fields(history_len = history.len(), max_attempts = self.policy.max_attempts)
    )]
    async fn respond(&self, message: &str, history: Vec<HistoryTurn>) -> String {
        let request = ResponderRequest {
            message: message.to_string(),
            history,
        };

        let mut attempt = 1;
        loop {
            match self.attempt(&request).await {
                Ok(text) => {
                    debug!(attempt, "Responder replied");
                    return text;
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Responder attempt failed");
                }
            }

            if !self.policy.should_retry(attempt) {
                break;
            }

            tokio::time::sleep(self.policy.backoff_for(attempt)).await;
            attempt += 1;
        }

        error!(attempts = attempt, "Responder unavailable, using fallback reply");
        self.fallback_message.clone()
    }
}
