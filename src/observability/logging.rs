//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config, overridable at runtime via `RUST_LOG`
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Upstream URLs and API keys are never logged

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::schema::ObservabilityConfig;

/// Default filter when `RUST_LOG` is unset.
pub fn default_filter(config: &ObservabilityConfig) -> String {
    let level = config.log_level.trim().to_ascii_lowercase();
    format!("news_proxy={level},tower_http={level}")
}

/// Install the global tracing subscriber. Call once, from `main`.
pub fn init_logging(config: &ObservabilityConfig) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
