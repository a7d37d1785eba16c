//! Service configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                   | Default        |
//! |----------------------------|----------------|
//! | `KURIRPAY_DATABASE_PATH`   | `kurirpay.db`  |
//! | `KURIRPAY_MAX_CONNECTIONS` | `5`            |
//! | `KURIRPAY_BUSY_TIMEOUT_MS` | `5000`         |
//! | `KURIRPAY_DEFAULT_RATE`    | `3000`         |
//! | `KURIRPAY_LOG_LEVEL`       | `info,kurir_payroll=debug,kurir_db=debug,sqlx=warn` |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use kurir_core::DEFAULT_DELIVERY_RATE;
use kurir_db::DbConfig;

/// Default tracing directive when neither `RUST_LOG` nor
/// `KURIRPAY_LOG_LEVEL` is set.
pub const DEFAULT_LOG_DIRECTIVE: &str = "info,kurir_payroll=debug,kurir_db=debug,sqlx=warn";

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// How long a writer waits for the SQLite write lock
    pub busy_timeout_ms: u64,

    /// Rate used when the settings row has no usable rate
    pub default_rate: i64,

    /// tracing-subscriber directive
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            database_path: PathBuf::from("kurirpay.db"),
            max_connections: 5,
            busy_timeout_ms: 5000,
            default_rate: DEFAULT_DELIVERY_RATE,
            log_level: DEFAULT_LOG_DIRECTIVE.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (environment, test map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServiceConfig::default();

        let config = ServiceConfig {
            database_path: lookup("KURIRPAY_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            max_connections: parse_or(&lookup, "KURIRPAY_MAX_CONNECTIONS", defaults.max_connections)?,

            busy_timeout_ms: parse_or(&lookup, "KURIRPAY_BUSY_TIMEOUT_MS", defaults.busy_timeout_ms)?,

            default_rate: parse_or(&lookup, "KURIRPAY_DEFAULT_RATE", defaults.default_rate)?,

            log_level: lookup("KURIRPAY_LOG_LEVEL").unwrap_or(defaults.log_level),
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue("KURIRPAY_MAX_CONNECTIONS".to_string()));
        }
        if config.default_rate < 1 {
            return Err(ConfigError::InvalidValue("KURIRPAY_DEFAULT_RATE".to_string()));
        }

        Ok(config)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone())
            .max_connections(self.max_connections)
            .busy_timeout(Duration::from_millis(self.busy_timeout_ms))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
