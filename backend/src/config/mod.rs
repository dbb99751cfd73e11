//! Configuration management for the BMI Go backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: BMIGO__)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

use bmigo_shared::{DEFAULT_CHART_POINTS, DEFAULT_PAGE_SIZE, DEFAULT_TREND_WINDOW};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// History screen configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Records added per "load more"
    pub page_size: usize,
    /// Records averaged for the recent BMI trend
    pub trend_window: usize,
    /// Records plotted on the trend chart
    pub chart_points: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            trend_window: DEFAULT_TREND_WINDOW,
            chart_points: DEFAULT_CHART_POINTS,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Force JSON output outside production
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://bmigo.db".to_string(),
                max_connections: 4,
            },
            history: HistoryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with BMIGO__ prefix
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name(&config_file).required(false))
            // e.g., BMIGO__HISTORY__PAGE_SIZE=50 sets history.page_size
            .add_source(config::Environment::with_prefix("BMIGO").separator("__"))
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the history screen cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.database.max_connections == 0 {
            bail!("database.max_connections must be at least 1");
        }
        if self.history.page_size == 0 {
            bail!("history.page_size must be at least 1");
        }
        if self.history.trend_window == 0 {
            bail!("history.trend_window must be at least 1");
        }
        if self.history.chart_points < 2 {
            bail!("history.chart_points must be at least 2");
        }
        Ok(())
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }

    /// Whether log output should be JSON
    pub fn json_logs(&self) -> bool {
        self.logging.json || Self::is_production()
    }
}
