//! Record renderers
//!
//! A [`Renderer`] turns a [`LogRecord`] into the final line handed to the
//! sink. The logger always has exactly one active renderer: the
//! [`DefaultRenderer`] or a caller-supplied one installed with
//! `Logger::set_formatter`.

use super::error::{LoggerError, Result};
use super::log_record::LogRecord;
use super::timestamp::TimestampFormat;
use std::any::Any;
use std::borrow::Cow;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Escape CR, LF and TAB so a record always occupies a single line
pub fn escape_line_breaks(text: &str) -> Cow<'_, str> {
    if !text.contains(['\n', '\r', '\t']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t"),
    )
}

/// Converts a log record into text
///
/// Implementations fully replace the default layout and may ignore any
/// part of the record. Errors, panics and empty output are all caught by the
/// logger, which falls back to `[<LEVEL>] <message>`.
///
/// # Example
///
/// ```
/// use interlaced_logger::{LogRecord, Renderer, Result};
///
/// struct Bracketed;
///
/// impl Renderer for Bracketed {
///     fn render(&mut self, record: &LogRecord) -> Result<String> {
///         Ok(format!("[Custom] {} {}", record.level, record.message))
///     }
/// }
/// ```
pub trait Renderer: Send {
    fn render(&mut self, record: &LogRecord) -> Result<String>;

    fn name(&self) -> &str {
        "custom"
    }
}

/// Fixed layout: `[prefix ][[timestamp] ][LEVEL] message[ [file:line]][ k=v ...]`
///
/// Prefix and timestamp are off unless configured.
#[derive(Debug, Clone, Default)]
pub struct DefaultRenderer {
    timestamp_format: TimestampFormat,
    prefix: Option<String>,
}

impl DefaultRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Text emitted before everything else on each line
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = (!prefix.is_empty()).then_some(prefix);
        self
    }

    pub fn timestamp_format(&self) -> &TimestampFormat {
        &self.timestamp_format
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Render without the `Result` wrapper; the default layout cannot fail
    pub fn format(&self, record: &LogRecord) -> String {
        let mut out = String::with_capacity(record.message.len() + 32);

        if let Some(ref prefix) = self.prefix {
            out.push_str(prefix);
            out.push(' ');
        }

        if let Some(timestamp) = self.timestamp_format.format(&record.timestamp) {
            out.push('[');
            out.push_str(&timestamp);
            out.push_str("] ");
        }

        out.push('[');
        out.push_str(record.level.to_str());
        out.push_str("] ");
        out.push_str(&escape_line_breaks(&record.message));

        if let (Some(file), Some(line)) = (record.file(), record.line()) {
            out.push_str(&format!(" [{}:{}]", file, line));
        }

        for (key, value) in record.fields.iter() {
            out.push(' ');
            out.push_str(&escape_line_breaks(key));
            out.push('=');
            out.push_str(&escape_line_breaks(&value.to_string()));
        }

        out
    }
}

impl Renderer for DefaultRenderer {
    fn render(&mut self, record: &LogRecord) -> Result<String> {
        Ok(self.format(record))
    }

    fn name(&self) -> &str {
        "default"
    }
}

/// Adapts a closure into a [`Renderer`]
///
/// ```
/// use interlaced_logger::{FnRenderer, LogRecord, Logger};
///
/// let logger = Logger::new();
/// logger.set_formatter(Some(Box::new(FnRenderer::new(|record: &LogRecord| {
///     format!("{} | {}", record.level, record.message)
/// }))));
/// ```
pub struct FnRenderer<F> {
    func: F,
}

impl<F> FnRenderer<F>
where
    F: FnMut(&LogRecord) -> String + Send,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Renderer for FnRenderer<F>
where
    F: FnMut(&LogRecord) -> String + Send,
{
    fn render(&mut self, record: &LogRecord) -> Result<String> {
        Ok((self.func)(record))
    }

    fn name(&self) -> &str {
        "fn"
    }
}

/// Line emitted when a renderer fails: level tag plus the unformatted message
pub fn fallback_line(record: &LogRecord) -> String {
    format!(
        "[{}] {}",
        record.level.to_str(),
        escape_line_breaks(&record.message)
    )
}

/// Extract a readable message from a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Run a renderer with panic isolation
///
/// Returns `FormatterError` when the renderer panics or produces an empty
/// line, and passes through any error it returns.
pub fn render_isolated(renderer: &mut dyn Renderer, record: &LogRecord) -> Result<String> {
    match catch_unwind(AssertUnwindSafe(|| renderer.render(record))) {
        Ok(Ok(text)) if text.is_empty() => {
            Err(LoggerError::formatter(renderer.name(), "renderer produced no output"))
        }
        Ok(result) => result,
        Err(payload) => Err(LoggerError::formatter(
            renderer.name(),
            format!("renderer panicked: {}", panic_message(payload.as_ref())),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;
    use crate::core::log_record::CallSite;
    use crate::core::log_value::Fields;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_default_layout() {
        let record = LogRecord::new(LogLevel::Info, "Application started");
        assert_eq!(
            DefaultRenderer::new().format(&record),
            "[INFO] Application started"
        );
    }

    #[test]
    fn test_default_layout_with_location_and_fields() {
        let record = LogRecord::new(LogLevel::Warning, "High memory usage")
            .with_call_site(CallSite::new("src/app/main.rs", 42))
            .with_fields(Fields::new().with("used_mb", 850).with("limit_mb", 1000));

        assert_eq!(
            DefaultRenderer::new().format(&record),
            "[WARNING] High memory usage [main.rs:42] used_mb=850 limit_mb=1000"
        );
    }

    #[test]
    fn test_prefix_and_timestamp() {
        let timestamp = Local.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).single().unwrap();
        let record = LogRecord::new(LogLevel::Error, "boom").with_timestamp(timestamp);

        let renderer = DefaultRenderer::new()
            .with_prefix("app")
            .with_timestamp_format(TimestampFormat::Standard);

        assert_eq!(renderer.format(&record), "app [2025-01-08 10:30:45] [ERROR] boom");
    }

    #[test]
    fn test_empty_prefix_is_ignored() {
        let renderer = DefaultRenderer::new().with_prefix("");
        assert_eq!(renderer.prefix(), None);
    }

    #[test]
    fn test_fn_renderer() {
        let mut renderer = FnRenderer::new(|record: &LogRecord| format!("<{}>", record.message));
        let record = LogRecord::new(LogLevel::Debug, "x");
        assert_eq!(renderer.render(&record).unwrap(), "<x>");
    }

    #[test]
    fn test_isolation_catches_panic() {
        let mut renderer = FnRenderer::new(|_: &LogRecord| -> String { panic!("bad renderer") });
        let record = LogRecord::new(LogLevel::Info, "msg");

        let err = render_isolated(&mut renderer, &record).unwrap_err();
        assert!(err.to_string().contains("bad renderer"));
    }

    #[test]
    fn test_isolation_rejects_empty_output() {
        let mut renderer = FnRenderer::new(|_: &LogRecord| String::new());
        let record = LogRecord::new(LogLevel::Info, "msg");

        let err = render_isolated(&mut renderer, &record).unwrap_err();
        assert!(matches!(err, LoggerError::FormatterError { .. }));
    }

    #[test]
    fn test_line_breaks_are_escaped() {
        let record = LogRecord::new(LogLevel::Info, "line one\nERROR fake\r\tend")
            .with_fields(Fields::new().with("k", "x\ny"));
        assert_eq!(
            DefaultRenderer::new().format(&record),
            "[INFO] line one\\nERROR fake\\r\\tend k=x\\ny"
        );
        assert_eq!(fallback_line(&record), "[INFO] line one\\nERROR fake\\r\\tend");
        assert!(matches!(escape_line_breaks("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_fallback_line() {
        let record = LogRecord::with_args(LogLevel::Error, "code {}", &[500.into()]);
        assert_eq!(fallback_line(&record), "[ERROR] code 500");
    }
}
