//! Tracing subscriber setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;

/// Default filter when `RUST_LOG` is unset
pub fn default_filter(production: bool) -> &'static str {
    if production {
        "bmigo_backend=info"
    } else {
        "bmigo_backend=debug,sqlx=warn"
    }
}

/// Install the global subscriber
///
/// JSON output in production (or when `logging.json` is set), pretty output
/// otherwise. Safe to call more than once; later calls are ignored.
pub fn init_tracing(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(AppConfig::is_production()).into());

    let subscriber = tracing_subscriber::registry().with(env_filter);

    let _ = if config.json_logs() {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
    };
}
