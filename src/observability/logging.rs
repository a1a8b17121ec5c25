//! Structured logging.
//!
//! `RUST_LOG` wins over the configured level when set. Logs go to stderr so
//! stdout carries only command output.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
pub fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(log_level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn default_filter(log_level: &str) -> String {
    format!("contract_deployer={log_level},warn")
}
