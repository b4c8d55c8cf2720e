//! Sink trait for log output destinations

use super::{error::Result, log_level::LogLevel};

/// An owned output target for rendered lines
///
/// The logger owns exactly one sink at a time and calls it only while
/// holding its lock.
pub trait Sink: Send {
    /// Write one rendered record; the sink appends the line terminator
    fn write(&mut self, level: LogLevel, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    /// Flush and release the underlying resources; later writes fail
    fn close(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
