//! Service configuration sourced from the environment.
//!
//! A `.env` file in the working directory is loaded first (if present);
//! variables already set in the process environment win.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::db::PoolConfig;

pub const ENV_DB_PATH: &str = "CLINIC_DB_PATH";
pub const ENV_POOL_FLOOR: &str = "CLINIC_POOL_FLOOR";
pub const ENV_POOL_CEILING: &str = "CLINIC_POOL_CEILING";
pub const ENV_POOL_TIMEOUT_MS: &str = "CLINIC_POOL_TIMEOUT_MS";
pub const ENV_HTTP_HOST: &str = "CLINIC_HTTP_HOST";
pub const ENV_HTTP_PORT: &str = "CLINIC_HTTP_PORT";
pub const ENV_LOG_LEVEL: &str = "CLINIC_LOG_LEVEL";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Pool floor {floor} must be >= 1 and <= pool ceiling {ceiling}")]
    InvalidPoolBounds { floor: usize, ceiling: usize },
}

/// Full service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClinicConfig {
    /// SQLite database file (default: "clinic.db")
    pub db_path: PathBuf,

    /// Connections opened at startup (default: 1)
    pub pool_floor: usize,

    /// Maximum open connections (default: 10)
    pub pool_ceiling: usize,

    /// Wait for a free connection before giving up (default: 5000)
    pub pool_timeout_ms: u64,

    /// Host to bind to (default: "127.0.0.1")
    pub http_host: String,

    /// Port to bind to (default: 5000)
    pub http_port: u16,

    /// Log specification, e.g. "info" or "clinic_core=debug" (default: "info")
    pub log_level: String,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("clinic.db")
}

fn default_pool_floor() -> usize {
    1
}

fn default_pool_ceiling() -> usize {
    10
}

fn default_pool_timeout_ms() -> u64 {
    5000
}

fn default_http_host() -> String {
    "127.0.0.1".to_string()
}

fn default_http_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            pool_floor: default_pool_floor(),
            pool_ceiling: default_pool_ceiling(),
            pool_timeout_ms: default_pool_timeout_ms(),
            http_host: default_http_host(),
            http_port: default_http_port(),
            log_level: default_log_level(),
        }
    }
}

fn parse_var<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}

impl ClinicConfig {
    /// Load `.env`, then read every `CLINIC_*` variable over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            db_path: lookup(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
            pool_floor: parse_var(ENV_POOL_FLOOR, lookup(ENV_POOL_FLOOR), default_pool_floor())?,
            pool_ceiling: parse_var(
                ENV_POOL_CEILING,
                lookup(ENV_POOL_CEILING),
                default_pool_ceiling(),
            )?,
            pool_timeout_ms: parse_var(
                ENV_POOL_TIMEOUT_MS,
                lookup(ENV_POOL_TIMEOUT_MS),
                default_pool_timeout_ms(),
            )?,
            http_host: lookup(ENV_HTTP_HOST).unwrap_or_else(default_http_host),
            http_port: parse_var(ENV_HTTP_PORT, lookup(ENV_HTTP_PORT), default_http_port())?,
            log_level: lookup(ENV_LOG_LEVEL).unwrap_or_else(default_log_level),
        };
        config.validate()?;
        Ok(config)
    }

    /// Require `1 <= pool_floor <= pool_ceiling`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_floor == 0 || self.pool_floor > self.pool_ceiling {
            return Err(ConfigError::InvalidPoolBounds {
                floor: self.pool_floor,
                ceiling: self.pool_ceiling,
            });
        }
        Ok(())
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(&self.db_path)
            .with_bounds(self.pool_floor, self.pool_ceiling)
            .with_acquire_timeout(Duration::from_millis(self.pool_timeout_ms))
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}
