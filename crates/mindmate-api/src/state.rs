//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! ChatService is generic over its repositories and responder; AppState pins
//! it to the SQLite repositories and the HTTP responder transport.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use mindmate_core::chat::service::ChatService;
use mindmate_core::crisis::detector::KeywordCrisisDetector;
use mindmate_core::responder::resilient::ResilientResponder;
use mindmate_infra::config::{load_config, resolve_database_url};
use mindmate_infra::filesystem::{ensure_data_dir, resolve_data_dir};
use mindmate_infra::responder::HttpResponderTransport;
use mindmate_infra::sqlite::message::SqliteMessageRepository;
use mindmate_infra::sqlite::pool::DatabasePool;
use mindmate_infra::sqlite::session::SqliteSessionRepository;
use mindmate_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteResponder = ResilientResponder<HttpResponderTransport>;

pub type ConcreteChatService =
    ChatService<SqliteSessionRepository, SqliteMessageRepository, ConcreteResponder>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        ensure_data_dir(&data_dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let config = load_config(&data_dir).await;
        Self::from_config(config, data_dir).await
    }

    /// Wire services from an already-loaded configuration.
    pub async fn from_config(config: AppConfig, data_dir: PathBuf) -> anyhow::Result<Self> {
        config.validate()?;

        let db_url = resolve_database_url(&config, &data_dir);
        let db_pool = DatabasePool::new(&db_url)
            .await
            .context("Failed to open database")?;

        let detector = KeywordCrisisDetector::from_config(&config.crisis);
        let transport = HttpResponderTransport::new(config.responder.base_url.clone())?;
        let responder = ResilientResponder::from_config(transport, &config.responder);

        tracing::debug!(
            responder = %config.responder.base_url,
            keywords = detector.keywords().len(),
            worst_case_reply_ms = responder.policy().worst_case_latency().as_millis() as u64,
            "Application state initialized"
        );

        let chat_service = ChatService::new(
            SqliteSessionRepository::new(db_pool.clone()),
            SqliteMessageRepository::new(db_pool.clone()),
            responder,
            Arc::new(detector),
            config.responder.history_limit,
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            config: Arc::new(config),
            data_dir,
            db_pool,
        })
    }
}
