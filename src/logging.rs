//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout carries nothing but the JSON response.
//! `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Filter directive applying `level` to this workspace's crates only.
///
/// Dependency logs (hyper, reqwest, html5ever) stay at `warn`.
pub fn default_directive(level: &str) -> String {
    format!("warn,omnisearch={level},omni_search={level}")
}

/// Install the global subscriber. Call once, at startup.
pub fn init(config: &LoggingConfig) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.level))),
        )
        .init();
}
