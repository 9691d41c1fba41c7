//! Runtime configuration, loaded from environment variables.
//!
//! Every field has a default so the crate can be wired up without any
//! environment set. The database pool built here is shared by the
//! `PostgreSQL` task and identity adapters.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

/// `PostgreSQL` connection pool type shared by the diesel adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Environment variable holding the database URL.
pub const DATABASE_URL_ENV: &str = "WORKFORCE_DATABASE_URL";
/// Environment variable holding the maximum pool size.
pub const POOL_SIZE_ENV: &str = "WORKFORCE_DB_POOL_SIZE";
/// Environment variable holding the `tracing` filter.
pub const LOG_ENV: &str = "WORKFORCE_LOG";
/// Environment variable enabling JSON log output.
pub const LOG_JSON_ENV: &str = "WORKFORCE_LOG_JSON";

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/workforce";
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime configuration for the workforce backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkforceConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: String,

    /// Maximum number of pooled connections.
    pub pool_max_size: u32,

    /// `tracing` filter string, e.g. `"info"` or `"workforce=debug"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,
}

impl Default for WorkforceConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            pool_max_size: DEFAULT_POOL_SIZE,
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
            log_json: false,
        }
    }
}

impl WorkforceConfig {
    /// Builds a configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            database_url: env_or(DATABASE_URL_ENV, DEFAULT_DATABASE_URL),
            pool_max_size: parse_env(POOL_SIZE_ENV, DEFAULT_POOL_SIZE).max(1),
            log_level: env_or(LOG_ENV, DEFAULT_LOG_LEVEL),
            log_json: std::env::var(LOG_JSON_ENV)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}

/// Builds the diesel r2d2 pool described by `config`.
///
/// # Errors
///
/// Returns [`PoolError`] when no initial connection can be established.
pub fn build_pool(config: &WorkforceConfig) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(config.database_url.as_str());
    Pool::builder()
        .max_size(config.pool_max_size)
        .build(manager)
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
