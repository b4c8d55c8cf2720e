//! Location-aware logging macros
//!
//! Each macro captures `file!()` and `line!()` at the call site and accepts
//! either the template convention or the structured convention:
//!
//! ```
//! use interlaced_logger::prelude::*;
//! use interlaced_logger::{info, warning};
//!
//! let out = MemoryStream::new();
//! let err = MemoryStream::new();
//! let logger = Logger::new();
//! logger.set_output_streams(out.clone(), err.clone());
//!
//! // Template: `{}` markers are filled left to right
//! info!(logger, "Server listening on port {}", 8080);
//!
//! // Structured: message followed by ordered key=value pairs
//! warning!(logger, "High memory usage"; "used_mb" => 850, "limit_mb" => 1000);
//!
//! assert!(out.contents().starts_with("[INFO] Server listening on port 8080 ["));
//! assert!(err.contents().ends_with("] used_mb=850 limit_mb=1000\n"));
//! ```
//!
//! Arguments are not evaluated when the level is below the threshold.

/// Log at an explicit level.
///
/// # Examples
///
/// ```
/// # use interlaced_logger::prelude::*;
/// # let logger = Logger::new();
/// # logger.set_output_streams(MemoryStream::new(), MemoryStream::new());
/// use interlaced_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// log!(logger, LogLevel::Debug, "cache"; "hits" => 10, "misses" => 2);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $message:expr; $($key:expr => $value:expr),+ $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log_fields_at(
                $crate::CallSite::new(file!(), line!()),
                level,
                $message,
                $crate::Fields::new()$(.with($key, $value))+,
            );
        }
    }};
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log_args_at(
                $crate::CallSite::new(file!(), line!()),
                level,
                $template,
                &[$($crate::LogValue::from($arg)),*],
            );
        }
    }};
}

/// Log a debug-level message.
///
/// ```
/// # use interlaced_logger::prelude::*;
/// # let logger = Logger::new();
/// # logger.set_output_streams(MemoryStream::new(), MemoryStream::new());
/// use interlaced_logger::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```
/// # use interlaced_logger::prelude::*;
/// # let logger = Logger::new();
/// # logger.set_output_streams(MemoryStream::new(), MemoryStream::new());
/// use interlaced_logger::warning;
/// warning!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogLevel, Logger};
    use crate::sinks::MemoryStream;
    use std::cell::Cell;

    fn capture() -> (Logger, MemoryStream, MemoryStream) {
        let out = MemoryStream::new();
        let err = MemoryStream::new();
        let logger = Logger::new();
        logger.set_output_streams(out.clone(), err.clone());
        (logger, out, err)
    }

    #[test]
    fn test_template_form_captures_location() {
        let (logger, out, _err) = capture();
        let line = line!() + 1;
        info!(logger, "User {} logged in from {}", "john", "10.0.0.1");

        assert_eq!(
            out.lines(),
            vec![format!("[INFO] User john logged in from 10.0.0.1 [macros.rs:{}]", line)]
        );
    }

    #[test]
    fn test_structured_form_keeps_order() {
        let (logger, _out, err) = capture();
        error!(logger, "request failed"; "k1" => 1, "k2" => "two",);

        let line = err.lines().remove(0);
        assert!(line.starts_with("[ERROR] request failed [macros.rs:"));
        assert!(line.ends_with("] k1=1 k2=two"));
    }

    #[test]
    fn test_plain_message() {
        let (logger, out, err) = capture();
        debug!(logger, "no args");
        warning!(logger, "careful");
        log!(logger, LogLevel::Info, "explicit {}", true);

        assert_eq!(out.lines().len(), 2);
        assert!(out.lines()[1].starts_with("[INFO] explicit true"));
        assert!(err.lines()[0].starts_with("[WARNING] careful"));
    }

    #[test]
    fn test_arguments_not_evaluated_when_filtered() {
        let (logger, out, _err) = capture();
        logger.set_level(LogLevel::Error);

        let evaluated = Cell::new(0);
        let expensive = || {
            evaluated.set(evaluated.get() + 1);
            42
        };
        debug!(logger, "value {}", expensive());
        info!(logger, "event"; "value" => expensive());

        assert_eq!(evaluated.get(), 0);
        assert!(out.contents().is_empty());
    }
}
