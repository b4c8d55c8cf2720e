//! Process-wide logger
//!
//! The global instance is created lazily with defaults (threshold `Debug`,
//! default layout, stdout/stderr) unless [`init_global`] installs one first.
//!
//! Statics are never dropped, so nothing closes the global sink when the
//! process exits on its own. Every record is flushed as it is written; to
//! also close the sink, call [`shutdown_global`] before exiting or hold a
//! [`GlobalGuard`] in `main`.

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::log_value::{Fields, LogValue};
use super::logger::Logger;
use std::sync::OnceLock;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// The process-wide logger, created with defaults on first use
pub fn global() -> &'static Logger {
    GLOBAL.get_or_init(Logger::new)
}

/// Install `logger` as the process-wide logger
///
/// # Errors
///
/// Returns `AlreadyInitialized` if the global logger exists already, either
/// from an earlier call or from a call to [`global`].
///
/// ```
/// use interlaced_logger::{global, init_global, LogLevel, Logger, MemoryStream};
///
/// let logger = Logger::builder()
///     .level(LogLevel::Info)
///     .output_streams(MemoryStream::new(), MemoryStream::new())
///     .build()
///     .unwrap();
///
/// init_global(logger).unwrap();
/// assert_eq!(global().level(), LogLevel::Info);
/// assert!(init_global(Logger::new()).is_err());
/// ```
pub fn init_global(logger: Logger) -> Result<()> {
    GLOBAL
        .set(logger)
        .map_err(|_| LoggerError::AlreadyInitialized)
}

/// Flush and close the global sink, if the global logger was ever created
pub fn shutdown_global() -> Result<()> {
    match GLOBAL.get() {
        Some(logger) => logger.shutdown(),
        None => Ok(()),
    }
}

/// Shuts the global logger down when dropped
///
/// ```
/// use interlaced_logger::core::global;
///
/// let guard = interlaced_logger::global_guard();
/// global::info("running");
/// drop(guard);
///
/// assert!(global::global().is_shut_down());
/// ```
#[must_use = "the global logger is shut down when the guard is dropped"]
#[derive(Debug)]
pub struct GlobalGuard {
    _private: (),
}

/// Guard that runs [`shutdown_global`] at the end of its scope
pub fn global_guard() -> GlobalGuard {
    GlobalGuard { _private: () }
}

impl Drop for GlobalGuard {
    fn drop(&mut self) {
        if let Err(e) = shutdown_global() {
            eprintln!("[LOGGER ERROR] Failed to shut down global logger: {}", e);
        }
    }
}

pub fn set_level(level: LogLevel) {
    global().set_level(level);
}

pub fn log(level: LogLevel, message: impl Into<String>) {
    global().log(level, message);
}

pub fn debug(message: impl Into<String>) {
    global().debug(message);
}

pub fn info(message: impl Into<String>) {
    global().info(message);
}

pub fn warning(message: impl Into<String>) {
    global().warning(message);
}

pub fn error(message: impl Into<String>) {
    global().error(message);
}

pub fn log_args(level: LogLevel, template: &str, args: &[LogValue]) {
    global().log_args(level, template, args);
}

pub fn log_fields(level: LogLevel, message: impl Into<String>, fields: Fields) {
    global().log_fields(level, message, fields);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::console::MemoryStream;

    // The global slot is shared by the whole test binary, so one test owns it
    #[test]
    fn test_global_lifecycle() {
        let out = MemoryStream::new();
        let err = MemoryStream::new();
        let logger = Logger::builder()
            .output_streams(out.clone(), err.clone())
            .build()
            .unwrap();

        init_global(logger).unwrap();
        assert!(matches!(
            init_global(Logger::new()),
            Err(LoggerError::AlreadyInitialized)
        ));

        set_level(LogLevel::Info);
        debug("hidden");
        info("started");
        log_args(LogLevel::Info, "user {}", &["john".into()]);
        log_fields(LogLevel::Warning, "slow", Fields::new().with("ms", 250));
        error("failed");

        assert_eq!(out.lines(), vec!["[INFO] started", "[INFO] user john"]);
        assert_eq!(err.lines(), vec!["[WARNING] slow ms=250", "[ERROR] failed"]);

        drop(global_guard());
        info("after shutdown");
        assert_eq!(out.lines().len(), 2);
        assert!(global().is_shut_down());
    }
}
