//! Console sink and in-memory stream

use crate::core::error::{LoggerError, Result};
use crate::core::log_level::LogLevel;
use crate::core::sink::Sink;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

#[cfg(feature = "console")]
use colored::Colorize;

/// Writes `Debug`/`Info` lines to the normal stream and `Warning`/`Error`
/// lines to the error stream
///
/// The streams belong to the caller: closing the sink flushes them and stops
/// writing but never closes them.
pub struct ConsoleSink {
    normal: Box<dyn Write + Send>,
    error: Box<dyn Write + Send>,
    use_colors: bool,
    closed: bool,
}

impl ConsoleSink {
    /// Console sink over the process stdout and stderr
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }

    pub fn new<N, E>(normal: N, error: E) -> Self
    where
        N: Write + Send + 'static,
        E: Write + Send + 'static,
    {
        Self {
            normal: Box::new(normal),
            error: Box::new(error),
            use_colors: false,
            closed: false,
        }
    }

    /// Color whole lines by level; has no effect without the `console` feature
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    #[cfg(feature = "console")]
    fn paint(&self, level: LogLevel, line: &str) -> String {
        if self.use_colors {
            line.color(level.color_code()).to_string()
        } else {
            line.to_string()
        }
    }

    #[cfg(not(feature = "console"))]
    fn paint(&self, _level: LogLevel, line: &str) -> String {
        line.to_string()
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, level: LogLevel, line: &str) -> Result<()> {
        if self.closed {
            return Err(LoggerError::sink_closed("console"));
        }

        let text = self.paint(level, line);
        let stream = if level.is_error_stream() {
            &mut self.error
        } else {
            &mut self.normal
        };

        writeln!(stream, "{}", text)?;
        stream.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.normal.flush()?;
        self.error.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.flush()
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Shared in-memory byte buffer usable as a console stream
///
/// Clones share the same buffer, so a test can hand one clone to the logger
/// and inspect the other.
///
/// ```
/// use interlaced_logger::{Logger, MemoryStream};
///
/// let out = MemoryStream::new();
/// let err = MemoryStream::new();
/// let logger = Logger::new();
/// logger.set_output_streams(out.clone(), err.clone());
///
/// logger.info("hello");
/// logger.error("boom");
///
/// assert_eq!(out.contents(), "[INFO] hello\n");
/// assert_eq!(err.contents(), "[ERROR] boom\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStream {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    /// Non-empty lines written so far
    pub fn lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
