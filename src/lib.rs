//! # Interlaced Logger
//!
//! A process-wide, leveled, structured logger with a single dispatch point.
//!
//! ## Features
//!
//! - **Severity filtering**: lock-free threshold check, nothing is built for
//!   filtered calls
//! - **Two message conventions**: `{}` templates and ordered `key=value` fields
//! - **Pluggable rendering**: default layout, JSON, or any custom [`Renderer`]
//! - **One sink at a time**: console streams or a rotating file
//! - **Thread Safe**: every record is written whole, in call order per thread
//!
//! ```
//! use interlaced_logger::prelude::*;
//!
//! let out = MemoryStream::new();
//! let err = MemoryStream::new();
//! let logger = Logger::new();
//! logger.set_output_streams(out.clone(), err.clone());
//!
//! logger.info("Application started");
//! logger.warning_fields("High memory usage", Fields::new().with("used_mb", 850));
//!
//! assert_eq!(out.contents(), "[INFO] Application started\n");
//! assert_eq!(err.contents(), "[WARNING] High memory usage used_mb=850\n");
//! ```
//!
//! The free functions in [`core::global`] forward to a process-wide instance
//! created on first use.

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        global, init_global, shutdown_global, CallSite, DefaultRenderer, Fields, FnRenderer,
        JsonRenderer, LogLevel, LogRecord, LogValue, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, LoggerMetrics, Renderer, Result, Sink, TimestampFormat,
    };
    pub use crate::sinks::{ConsoleSink, FileSink, MemoryStream, RotationPolicy};
}

pub use crate::core::{
    escape_line_breaks, fallback_line, global, global_guard, init_global, render_isolated,
    shutdown_global, CallSite, DefaultRenderer, FileConfig, Fields, FnRenderer, GlobalGuard,
    JsonRenderer, LogLevel, LogRecord, LogValue, Logger, LoggerBuilder, LoggerConfig, LoggerError,
    LoggerMetrics, Renderer, Result, RotationConfig, Sink, TimestampFormat,
};
pub use crate::sinks::{backup_path, ConsoleSink, FileSink, MemoryStream, RotationPolicy, SinkState};
