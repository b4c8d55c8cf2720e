//! Timestamp formatting utilities
//!
//! Configurable timestamp formats for the default renderer. Record
//! timestamps are wall-clock local time.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const STANDARD_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use interlaced_logger::TimestampFormat;
/// use chrono::Local;
///
/// let format = TimestampFormat::Standard;
/// let text = format.format(&Local::now()).unwrap();
/// assert_eq!(text.len(), "2025-01-08 10:30:45".len());
///
/// assert_eq!(TimestampFormat::None.format(&Local::now()), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// No timestamp (default)
    #[default]
    None,

    /// `2025-01-08 10:30:45`
    Standard,

    /// ISO 8601 with milliseconds and offset: `2025-01-08T10:30:45.123+01:00`
    Iso8601,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    ///
    /// ```
    /// use interlaced_logger::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a timestamp, or `None` when timestamps are disabled
    ///
    /// A `Custom` pattern chrono cannot render falls back to the `Standard`
    /// layout instead of failing.
    #[must_use]
    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> Option<String>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        match self {
            TimestampFormat::None => None,
            TimestampFormat::Standard => render_pattern(datetime, STANDARD_PATTERN),
            TimestampFormat::Iso8601 => render_pattern(datetime, "%Y-%m-%dT%H:%M:%S%.3f%:z"),
            TimestampFormat::Unix => Some(datetime.timestamp().to_string()),
            TimestampFormat::UnixMillis => Some(datetime.timestamp_millis().to_string()),
            TimestampFormat::Custom(pattern) => render_pattern(datetime, pattern)
                .or_else(|| render_pattern(datetime, STANDARD_PATTERN)),
        }
    }

    /// Reject `Custom` patterns chrono does not understand
    ///
    /// ```
    /// use interlaced_logger::TimestampFormat;
    ///
    /// assert!(TimestampFormat::Custom("%H:%M".into()).validate().is_ok());
    /// assert!(TimestampFormat::Custom("%Q".into()).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if let TimestampFormat::Custom(pattern) = self {
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(LoggerError::config(
                    "timestamp format",
                    format!("invalid strftime pattern '{}'", pattern),
                ));
            }
        }
        Ok(())
    }

    /// Check if this is a Unix-based numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::Unix | TimestampFormat::UnixMillis)
    }
}

/// `chrono` reports a bad pattern through `fmt::Error` at display time
fn render_pattern<Tz>(datetime: &DateTime<Tz>, pattern: &str) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut text = String::new();
    write!(text, "{}", datetime.format(pattern)).ok()?;
    Some(text)
}
