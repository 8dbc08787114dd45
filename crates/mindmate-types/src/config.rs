//! Configuration types for MindMate.
//!
//! `AppConfig` represents the top-level `config.toml`. Every field has a
//! default, so an empty file (or no file) yields a working configuration.
//! The crisis keyword list and responder endpoint are plain data here and
//! are handed to the detector and client at startup.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Built-in crisis phrases, in match-priority order.
pub const DEFAULT_CRISIS_KEYWORDS: [&str; 8] = [
    "kill myself",
    "suicide",
    "end it all",
    "hurt myself",
    "want to die",
    "no reason to live",
    "better off dead",
    "ending my life",
];

/// Built-in safety message returned when a crisis phrase is detected.
pub const DEFAULT_SAFETY_MESSAGE: &str = "I detect that you might be going through a difficult time. I am an AI and cannot provide professional help, but there are people who can.

**Emergency Helplines (Nigeria):**
- **Lagos State Emergency:** 112 or 767
- **NG Suicide Prevention Initiative:** +234 806 210 6493
- **Mentally Aware Nigeria:** +234 809 111 6264

This chat session has been paused for your safety. Please reach out to one of these numbers immediately.";

/// Reply used when every attempt against the responder fails.
pub const DEFAULT_FALLBACK_MESSAGE: &str = "I'm having a little trouble responding right now, but I'm still here with you. Would you like to tell me more about how you're feeling?";

/// Reply used when the responder answers without any recognised text field.
pub const DEFAULT_EMPTY_REPLY_MESSAGE: &str = "I'm listening. Please go on.";

/// Top-level configuration for the MindMate server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Database URL. Defaults to a SQLite file in the data directory.
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default)]
    pub responder: ResponderConfig,

    #[serde(default)]
    pub crisis: CrisisConfig,
}

impl AppConfig {
    /// Reject values that would make the engine unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.responder.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "responder.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.responder.attempt_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "responder.attempt_timeout_ms must be positive".to_string(),
            ));
        }
        if self.responder.history_limit == 0 {
            return Err(ConfigError::Invalid(
                "responder.history_limit must be at least 1".to_string(),
            ));
        }
        if self.crisis.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "crisis.keywords must contain at least one phrase".to_string(),
            ));
        }

        // Each of these is stored as message content, which cannot be empty
        let stored_texts = [
            ("crisis.safety_message", &self.crisis.safety_message),
            ("responder.fallback_message", &self.responder.fallback_message),
            ("responder.empty_reply_message", &self.responder.empty_reply_message),
        ];
        if let Some((field, _)) = stored_texts.iter().find(|(_, text)| text.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("{field} must not be blank")));
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Settings for the outbound AI responder client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Total attempts per reply, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,

    /// Delay after failed attempt `n` is `backoff_base_ms * n`.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Number of most recent messages sent as history.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,

    #[serde(default = "default_empty_reply_message")]
    pub empty_reply_message: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/chat".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_attempt_timeout_ms() -> u64 {
    30_000
}

fn default_backoff_base_ms() -> u64 {
    1_000
}

fn default_history_limit() -> usize {
    10
}

fn default_fallback_message() -> String {
    DEFAULT_FALLBACK_MESSAGE.to_string()
}

fn default_empty_reply_message() -> String {
    DEFAULT_EMPTY_REPLY_MESSAGE.to_string()
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_attempts: default_max_attempts(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
            backoff_base_ms: default_backoff_base_ms(),
            history_limit: default_history_limit(),
            fallback_message: default_fallback_message(),
            empty_reply_message: default_empty_reply_message(),
        }
    }
}

/// Keyword list and safety text for the crisis detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrisisConfig {
    /// Phrases checked in list order; the first one found wins.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    #[serde(default = "default_safety_message")]
    pub safety_message: String,
}

fn default_keywords() -> Vec<String> {
    DEFAULT_CRISIS_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

fn default_safety_message() -> String {
    DEFAULT_SAFETY_MESSAGE.to_string()
}

impl Default for CrisisConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            safety_message: default_safety_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.responder.max_attempts, 3);
        assert_eq!(config.responder.attempt_timeout_ms, 30_000);
        assert_eq!(config.responder.history_limit, 10);
        assert_eq!(config.crisis.keywords.len(), 8);
        assert_eq!(config.crisis.keywords[0], "kill myself");
        assert!(config.database_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.responder.backoff_base_ms, 1_000);
        assert!(config.crisis.safety_message.contains("112"));
    }

    #[test]
    fn test_app_config_deserialize_with_values() {
        let toml_str = r#"
database_url = "sqlite:///tmp/mm.db"

[server]
port = 8080

[responder]
base_url = "http://ai.internal/chat"
max_attempts = 5

[crisis]
keywords = ["give up", "suicide"]
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database_url.as_deref(), Some("sqlite:///tmp/mm.db"));
        assert_eq!(config.responder.base_url, "http://ai.internal/chat");
        assert_eq!(config.responder.max_attempts, 5);
        assert_eq!(config.responder.attempt_timeout_ms, 30_000);
        assert_eq!(config.crisis.keywords, vec!["give up", "suicide"]);
        assert_eq!(config.crisis.safety_message, DEFAULT_SAFETY_MESSAGE);
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = AppConfig::default();
        config.responder.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_keywords() {
        let mut config = AppConfig::default();
        config.crisis.keywords = vec!["  ".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_safety_message() {
        let mut config = AppConfig::default();
        config.crisis.safety_message = "   ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("crisis.safety_message"));
    }

    #[test]
    fn test_validate_rejects_blank_fallback_message() {
        let mut config = AppConfig::default();
        config.responder.fallback_message = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("responder.fallback_message"));
    }

    #[test]
    fn test_validate_rejects_blank_empty_reply_message() {
        let mut config = AppConfig::default();
        config.responder.empty_reply_message = "\n\t".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("responder.empty_reply_message"));
    }

    #[test]
    fn test_blank_safety_message_from_toml_is_rejected() {
        let config: AppConfig = toml::from_str("[crisis]\nsafety_message = \"\"\n").unwrap();
        assert!(config.validate().is_err());
    }
}
