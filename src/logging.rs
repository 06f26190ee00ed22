//! # Structured Logging
//!
//! Environment-aware tracing initialization for hosts that do not bring
//! their own subscriber. Embedding applications with an existing global
//! subscriber can skip this entirely; initialization is idempotent either
//! way.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console logging with an environment-derived default level.
/// `RUST_LOG` overrides everything; repeated calls are no-ops.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = detect_environment();
        let default_level = default_level(&environment);
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_filter(filter),
        );

        // A host may already have installed a global subscriber; that is
        // fine, keep using it.
        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }

        tracing::debug!(environment = %environment, "Bridge logging initialized");
    });
}

fn detect_environment() -> String {
    std::env::var("QUARTZ_BRIDGE_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

fn default_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_defaults_to_info() {
        assert_eq!(default_level("production"), "info");
        assert_eq!(default_level("development"), "debug");
        assert_eq!(default_level("anything-else"), "debug");
    }
}
