//! Bounded retry policy for responder calls.
//!
//! Stateless: callers track the attempt number (1-based) and ask the policy
//! whether another attempt is allowed and how long to wait first.

use std::time::Duration;

use mindmate_types::config::ResponderConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Hard limit on a single attempt; the attempt is cancelled when it elapses.
    pub attempt_timeout: Duration,
    /// Delay unit; the wait after failed attempt `n` is `backoff_base * n`.
    pub backoff_base: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ResponderConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            attempt_timeout: Duration::from_millis(config.attempt_timeout_ms),
            backoff_base: Duration::from_millis(config.backoff_base_ms),
        }
    }

    /// Whether another attempt may follow failed attempt `attempt`.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Wait before the attempt that follows failed attempt `attempt`.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(attempt)
    }

    /// Upper bound on time spent before the fallback is returned.
    pub fn worst_case_latency(&self) -> Duration {
        let timeouts = self.attempt_timeout.saturating_mul(self.max_attempts);
        (1..self.max_attempts)
            .map(|attempt| self.backoff_for(attempt))
            .fold(timeouts, Duration::saturating_add)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ResponderConfig::default())
    }
}
