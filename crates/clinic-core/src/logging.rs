//! Logging bootstrap.
//!
//! Installs a `flexi_logger` backend behind the `log` facade exactly once per
//! process. `RUST_LOG`, when set, takes precedence over the configured spec.
//! Events across the crate use `event=<name> module=<module> status=<...>`
//! key=value lines.

use flexi_logger::{Logger, LoggerHandle, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use thiserror::Error;

static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("invalid log specification `{spec}`: {reason}")]
    InvalidSpec { spec: String, reason: String },

    #[error("failed to start logger: {0}")]
    Start(String),
}

/// Start logging to stderr with `spec` (e.g. `"info"`).
///
/// Repeated calls are no-ops once a logger is active.
pub fn init_logging(spec: &str) -> Result<(), LoggingError> {
    LOGGER.get_or_try_init(|| -> Result<LoggerHandle, LoggingError> {
        let handle = Logger::try_with_env_or_str(spec)
            .map_err(|err| LoggingError::InvalidSpec {
                spec: spec.to_string(),
                reason: err.to_string(),
            })?
            .log_to_stderr()
            .format(flexi_logger::detailed_format)
            .write_mode(WriteMode::Direct)
            .start()
            .map_err(|err| LoggingError::Start(err.to_string()))?;

        info!(
            "event=app_start module=core status=ok version={} level={}",
            env!("CARGO_PKG_VERSION"),
            spec
        );
        Ok(handle)
    })?;
    Ok(())
}

