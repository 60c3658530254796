//! Process-wide logger handle
//!
//! Applications that prefer passing a [`Logger`] around can ignore this module.
//! For the rest, [`init`] installs one logger for the lifetime of the process.
//! Statics are never dropped, so call [`shutdown`] before exiting to flush
//! pending messages.
//!
//! # Example
//!
//! ```no_run
//! use message_logger::{global, Logger, DEFAULT_SHUTDOWN_TIMEOUT};
//!
//! global::init(Logger::new().unwrap()).unwrap();
//! global::info("ready");
//! global::shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
//! ```

use crate::core::{Logger, LoggerError, Result, Severity};
use std::sync::OnceLock;
use std::time::Duration;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Install `logger` as the process-wide logger
///
/// Fails with [`LoggerError::AlreadyInitialized`] on a second call; the
/// rejected logger is shut down and dropped.
pub fn init(logger: Logger) -> Result<&'static Logger> {
    GLOBAL
        .set(logger)
        .map_err(|_rejected| LoggerError::AlreadyInitialized)?;
    GLOBAL.get().ok_or(LoggerError::AlreadyInitialized)
}

/// The process-wide logger, if [`init`] has been called
pub fn get() -> Option<&'static Logger> {
    GLOBAL.get()
}

/// Log through the process-wide logger; does nothing before [`init`]
pub fn log(severity: Severity, text: impl Into<String>) {
    if let Some(logger) = get() {
        logger.log(severity, text);
    }
}

pub fn info(text: impl Into<String>) {
    log(Severity::Info, text);
}

pub fn warn(text: impl Into<String>) {
    log(Severity::Warning, text);
}

pub fn error(text: impl Into<String>) {
    log(Severity::Error, text);
}

/// Write an already formatted line through the process-wide logger
pub fn log_raw(text: impl Into<String>) {
    if let Some(logger) = get() {
        logger.log_raw(text);
    }
}

/// Drain and stop the process-wide logger
///
/// Returns `true` when there is nothing to stop.
pub fn shutdown(timeout: Duration) -> bool {
    get().map_or(true, |logger| logger.shutdown(timeout))
}

/// Route the `log` crate's macros into the process-wide logger
#[cfg(feature = "log-facade")]
pub fn install_log_facade() -> Result<()> {
    let logger = get().ok_or_else(|| LoggerError::other("global logger not initialized"))?;
    ::log::set_logger(logger).map_err(|e| LoggerError::other(e.to_string()))?;
    ::log::set_max_level(::log::LevelFilter::Trace);
    Ok(())
}
