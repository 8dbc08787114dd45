//! Configuration loader for MindMate.
//!
//! Reads `config.toml` from the data directory (`~/.mindmate/` in production)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed, then applies `MINDMATE_*` environment
//! overrides on top.

use std::path::Path;

use mindmate_types::config::AppConfig;

use crate::filesystem::config_path;
use crate::sqlite::pool::database_url_for;

pub const ENV_HOST: &str = "MINDMATE_HOST";
pub const ENV_PORT: &str = "MINDMATE_PORT";
pub const ENV_DATABASE_URL: &str = "MINDMATE_DATABASE_URL";
pub const ENV_RESPONDER_URL: &str = "MINDMATE_RESPONDER_URL";

/// Load configuration from `{data_dir}/config.toml` plus environment overrides.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config = load_config_file(data_dir).await;
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Load `{data_dir}/config.toml` without environment overrides.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file cannot be read or parsed, logs a warning and returns the default.
pub async fn load_config_file(data_dir: &Path) -> AppConfig {
    let path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// Apply `MINDMATE_*` overrides read through `lookup`.
///
/// Blank values are ignored; an unparsable port is logged and skipped.
pub fn apply_env_overrides<F>(mut config: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(host) = get(ENV_HOST) {
        config.server.host = host;
    }
    if let Some(port) = get(ENV_PORT) {
        match port.parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(err) => tracing::warn!("Ignoring {ENV_PORT}={port}: {err}"),
        }
    }
    if let Some(url) = get(ENV_DATABASE_URL) {
        config.database_url = Some(url);
    }
    if let Some(url) = get(ENV_RESPONDER_URL) {
        config.responder.base_url = url;
    }
    config
}

/// Database URL to connect to: the configured one, else the data-dir default.
pub fn resolve_database_url(config: &AppConfig, data_dir: &Path) -> String {
    config
        .database_url
        .clone()
        .unwrap_or_else(|| database_url_for(data_dir))
}
