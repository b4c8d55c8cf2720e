//! File sink with size or interval based rotation

use super::rotation::{shift_backups, RotationPolicy};
use crate::core::error::{LoggerError, Result};
use crate::core::log_level::LogLevel;
use crate::core::metrics::LoggerMetrics;
use crate::core::sink::Sink;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Lifecycle of a [`FileSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    /// Accepting writes
    Open,
    /// Transient, only observable while a rotation is in progress
    Rotating,
    /// Flushed and released; every later write fails
    Closed,
}

/// Appends one line per record to a file and rotates it per [`RotationPolicy`]
///
/// Each record goes to the file as one `write_all` of the line and its
/// newline, with no user-space buffering, so a failed write never resurfaces
/// later. Rotation failures never reach
/// the caller: the sink reopens the live file in append mode and keeps
/// writing to it.
///
/// # Examples
///
/// ```no_run
/// use interlaced_logger::{FileSink, LogLevel, RotationPolicy, Sink};
///
/// let mut sink = FileSink::open("/var/log/app.log", RotationPolicy::by_size(1024 * 1024, 5)).unwrap();
/// sink.write(LogLevel::Info, "[INFO] started").unwrap();
/// ```
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    policy: RotationPolicy,
    file: Option<File>,
    line_buf: Vec<u8>,
    bytes_written: u64,
    last_rotation: Instant,
    state: SinkState,
    metrics: Option<Arc<LoggerMetrics>>,
}

impl FileSink {
    /// Open (or create) the file at `path` in append mode
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for an empty path or an invalid policy,
    /// and an IO error when the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.as_os_str().is_empty() {
            return Err(LoggerError::config("file sink", "path must not be empty"));
        }
        policy.validate()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, size) = Self::open_append(&path)?;

        Ok(Self {
            path,
            policy,
            file: Some(file),
            line_buf: Vec::new(),
            bytes_written: size,
            last_rotation: Instant::now(),
            state: SinkState::Open,
            metrics: None,
        })
    }

    /// Report rotations and rotation failures to `metrics`
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<LoggerMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Bytes in the live file, including content present before opening
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    #[must_use]
    pub fn state(&self) -> SinkState {
        self.state
    }

    fn open_append(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_sink(path.display().to_string(), format!("Failed to open: {}", e))
            })?;

        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_sink(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        Ok((file, size))
    }

    /// Close the live file, shift the backups and start an empty file
    fn rotate(&mut self) -> Result<()> {
        self.state = SinkState::Rotating;

        if let Some(mut file) = self.file.take() {
            file.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        let max_files = self.policy.max_files().unwrap_or(1);
        shift_backups(&self.path, max_files)?;

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| {
                LoggerError::file_rotation(
                    self.path.display().to_string(),
                    format!("Failed to create new log file: {}", e),
                )
            })?;

        self.file = Some(file);
        self.bytes_written = 0;
        self.last_rotation = Instant::now();
        self.state = SinkState::Open;
        Ok(())
    }

    /// Rotate, falling back to appending to the live file on failure
    ///
    /// Counters are reset either way so a failed rotation is retried at the
    /// next threshold crossing rather than on every write.
    fn rotate_or_recover(&mut self) {
        match self.rotate() {
            Ok(()) => {
                if let Some(ref metrics) = self.metrics {
                    metrics.record_rotation();
                }
            }
            Err(e) => {
                eprintln!(
                    "[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.",
                    e
                );
                if let Some(ref metrics) = self.metrics {
                    metrics.record_rotation_failure();
                }

                if self.file.is_none() {
                    match Self::open_append(&self.path) {
                        Ok((file, _)) => self.file = Some(file),
                        Err(reopen) => {
                            eprintln!(
                                "[LOGGER ERROR] Failed to reopen '{}' after rotation failure: {}",
                                self.path.display(),
                                reopen
                            );
                            self.state = SinkState::Closed;
                            return;
                        }
                    }
                }

                self.bytes_written = 0;
                self.last_rotation = Instant::now();
                self.state = SinkState::Open;
            }
        }
    }
}

impl Sink for FileSink {
    fn write(&mut self, _level: LogLevel, line: &str) -> Result<()> {
        if self.state == SinkState::Closed {
            return Err(LoggerError::sink_closed(self.path.display().to_string()));
        }

        if self.policy.due_before_write(self.last_rotation) {
            self.rotate_or_recover();
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| LoggerError::sink_closed(self.path.display().to_string()))?;

        self.line_buf.clear();
        self.line_buf.extend_from_slice(line.as_bytes());
        self.line_buf.push(b'\n');
        file.write_all(&self.line_buf)?;
        self.bytes_written += self.line_buf.len() as u64;

        if self.policy.due_after_write(self.bytes_written) {
            self.rotate_or_recover();
        }

        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut file) = self.file {
            file.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.state = SinkState::Closed;
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}
