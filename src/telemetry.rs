//! Structured logging setup.

use crate::config::WorkforceConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Builds the log filter, preferring `RUST_LOG` over the configured level.
///
/// An unparseable directive at either source is skipped; when neither
/// parses the filter falls back to `info`.
#[must_use]
pub fn env_filter(config: &WorkforceConfig) -> EnvFilter {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    resolve_filter(from_env.as_deref(), &config.log_level)
}

fn resolve_filter(from_env: Option<&str>, configured: &str) -> EnvFilter {
    from_env
        .and_then(|directives| directives.parse::<EnvFilter>().ok())
        .or_else(|| configured.parse::<EnvFilter>().ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Installs the global `tracing` subscriber.
///
/// # Errors
///
/// Returns [`TryInitError`] when a global subscriber is already installed.
pub fn init_tracing(config: &WorkforceConfig) -> Result<(), TryInitError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(true);
    if config.log_json {
        builder.json().finish().try_init()
    } else {
        builder.finish().try_init()
    }
}
