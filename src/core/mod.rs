//! Core logger types and traits

pub mod config;
pub mod error;
pub mod global;
pub mod json_renderer;
pub mod log_level;
pub mod log_record;
pub mod log_value;
pub mod logger;
pub mod metrics;
pub mod renderer;
pub mod sink;
pub mod template;
pub mod timestamp;

pub use config::{FileConfig, LoggerConfig, RotationConfig};
pub use error::{LoggerError, Result};
pub use global::{global, global_guard, init_global, shutdown_global, GlobalGuard};
pub use json_renderer::JsonRenderer;
pub use log_level::LogLevel;
pub use log_record::{CallSite, LogRecord};
pub use log_value::{Fields, LogValue};
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use renderer::{
    escape_line_breaks, fallback_line, render_isolated, DefaultRenderer, FnRenderer, Renderer,
};
pub use sink::Sink;
pub use timestamp::TimestampFormat;
