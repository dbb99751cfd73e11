//! Application state management
//!
//! Everything a UI host needs to drive the calculator and history screens:
//! configuration plus the history gateway, both behind `Arc` so the state
//! clones cheaply across tasks.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::AppConfig;
use crate::db;
use crate::repositories::{HistoryRepository, InMemoryHistoryRepository, SqliteHistoryRepository};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// History persistence gateway
    pub history: Arc<dyn HistoryRepository>,
}

impl AppState {
    /// Create a state over an existing gateway
    pub fn new(config: AppConfig, history: Arc<dyn HistoryRepository>) -> Self {
        Self {
            config: Arc::new(config),
            history,
        }
    }

    /// Open the configured SQLite database, run migrations and build the state
    pub async fn connect(config: AppConfig) -> Result<Self> {
        let pool = db::create_pool(&config.database.url, config.database.max_connections).await?;
        db::run_migrations(&pool).await?;
        info!("History database ready");
        Ok(Self::new(config, Arc::new(SqliteHistoryRepository::new(pool))))
    }

    /// State backed by process memory only
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(config, Arc::new(InMemoryHistoryRepository::new()))
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the history gateway
    #[inline]
    pub fn history(&self) -> &dyn HistoryRepository {
        self.history.as_ref()
    }
}
