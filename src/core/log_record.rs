//! Log record structure

use super::log_level::LogLevel;
use super::log_value::{Fields, LogValue};
use super::template;
use chrono::{DateTime, Local};
use std::cell::RefCell;
use std::panic::Location;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

fn get_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// Source location of a logging call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Capture the location of the caller
    ///
    /// Functions marked `#[track_caller]` forward their own caller's location.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line())
    }

    /// Final path component of the source file
    pub fn file_name(&self) -> &'static str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file)
    }
}

/// A single log call, built only after the level passed the threshold
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    /// Message with positional arguments already substituted
    pub message: String,
    /// Positional arguments in text form
    pub args: Vec<String>,
    pub fields: Fields,
    pub timestamp: DateTime<Local>,
    pub call_site: Option<CallSite>,
    pub thread_id: String,
    pub thread_name: Option<String>,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            args: Vec::new(),
            fields: Fields::new(),
            timestamp: Local::now(),
            call_site: None,
            thread_id: get_thread_id(),
            thread_name: get_thread_name(),
        }
    }

    /// Build a record using the template convention
    pub fn with_args(level: LogLevel, template: &str, args: &[LogValue]) -> Self {
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();
        let message = template::substitute(template, &args);
        let mut record = Self::new(level, message);
        record.args = args;
        record
    }

    /// Attach structured fields
    #[must_use]
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_call_site(mut self, site: CallSite) -> Self {
        self.call_site = Some(site);
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Source file name (final path component), if a call site was captured
    pub fn file(&self) -> Option<&'static str> {
        self.call_site.map(|site| site.file_name())
    }

    pub fn line(&self) -> Option<u32> {
        self.call_site.map(|site| site.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_record() {
        let record = LogRecord::with_args(
            LogLevel::Info,
            "User {} logged in from {}",
            &["john".into(), "10.0.0.1".into()],
        );
        assert_eq!(record.message, "User john logged in from 10.0.0.1");
        assert_eq!(record.args, vec!["john", "10.0.0.1"]);
        assert!(record.fields.is_empty());
    }

    #[test]
    fn test_message_text_is_kept_verbatim() {
        // Escaping belongs to the text layouts, not the record
        let record = LogRecord::with_args(LogLevel::Info, "value: {}", &["a\nb".into()])
            .with_fields(Fields::new().with("k", "x\ty"));
        assert_eq!(record.message, "value: a\nb");
        let (_, value) = record.fields.iter().next().unwrap();
        assert_eq!(value.to_string(), "x\ty");
    }

    #[test]
    fn test_call_site_file_name() {
        assert_eq!(CallSite::new("src/net/server.rs", 10).file_name(), "server.rs");
        assert_eq!(CallSite::new("C:\\proj\\main.rs", 3).file_name(), "main.rs");
        assert_eq!(CallSite::new("lib.rs", 1).file_name(), "lib.rs");
    }

    #[test]
    fn test_call_site_caller() {
        let site = CallSite::caller();
        assert_eq!(site.file_name(), "log_record.rs");
        assert!(site.line > 0);

        let record = LogRecord::new(LogLevel::Debug, "x").with_call_site(site);
        assert_eq!(record.file(), Some("log_record.rs"));
        assert_eq!(record.line(), Some(site.line));
    }

    #[test]
    fn test_thread_info_cached() {
        let first = LogRecord::new(LogLevel::Info, "a");
        let second = LogRecord::new(LogLevel::Info, "b");
        assert_eq!(first.thread_id, second.thread_id);
    }
}
