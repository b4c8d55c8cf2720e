//! Main logger implementation

use super::{
    config::LoggerConfig,
    error::Result,
    log_level::LogLevel,
    log_record::{CallSite, LogRecord},
    log_value::{Fields, LogValue},
    metrics::LoggerMetrics,
    renderer::{
        escape_line_breaks, fallback_line, panic_message, render_isolated, DefaultRenderer,
        Renderer,
    },
    sink::Sink,
    timestamp::TimestampFormat,
};
use crate::sinks::{ConsoleSink, FileSink, RotationPolicy};
use parking_lot::Mutex;
use std::fmt;
use std::io::Write;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Internal faults are reported on the first occurrence and every 1000th after
fn should_alert(previous: u64) -> bool {
    previous == 0 || (previous + 1) % 1000 == 0
}

/// Everything the render and write path touches, guarded by one lock
struct LoggerState {
    default_renderer: DefaultRenderer,
    custom: Option<Box<dyn Renderer>>,
    sink: Box<dyn Sink>,
    closed: bool,
}

impl LoggerState {
    fn render(&mut self, record: &LogRecord, metrics: &LoggerMetrics) -> String {
        let renderer: &mut dyn Renderer = match self.custom.as_deref_mut() {
            Some(custom) => custom,
            None => &mut self.default_renderer,
        };

        match render_isolated(renderer, record) {
            Ok(line) => escape_line_breaks(&line).into_owned(),
            Err(e) => {
                if should_alert(metrics.record_renderer_fallback()) {
                    eprintln!("[LOGGER WARNING] {}. Using fallback layout.", e);
                }
                fallback_line(record)
            }
        }
    }

    /// Write one line with panic isolation around the sink
    fn write(&mut self, level: LogLevel, line: &str, metrics: &LoggerMetrics) {
        let sink = &mut self.sink;
        let result = catch_unwind(AssertUnwindSafe(|| sink.write(level, line)));

        let failure = match result {
            Ok(Ok(())) => {
                metrics.record_written();
                return;
            }
            Ok(Err(e)) => e.to_string(),
            Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
        };

        let previous = metrics.record_dropped();
        if should_alert(previous) {
            eprintln!(
                "[LOGGER ERROR] Sink '{}' failed, {} records dropped: {}",
                self.sink.name(),
                previous + 1,
                failure
            );
        }
    }

    /// Flush and close the active sink, reporting but not propagating errors
    fn close_sink(&mut self) {
        if let Err(e) = self.sink.close() {
            eprintln!(
                "[LOGGER ERROR] Failed to close sink '{}': {}",
                self.sink.name(),
                e
            );
        }
    }
}

/// Leveled logger with one renderer and one sink
///
/// `Logger` is a cheap handle: clones share the threshold, renderer, sink
/// and metrics. Every call is synchronous and the line is flushed before the
/// call returns.
///
/// # Example
///
/// ```
/// use interlaced_logger::{Fields, LogLevel, Logger, MemoryStream};
///
/// let out = MemoryStream::new();
/// let logger = Logger::new();
/// logger.set_output_streams(out.clone(), MemoryStream::new());
/// logger.set_level(LogLevel::Info);
///
/// logger.debug("hidden");
/// logger.info_args("User {} logged in from {}", &["john".into(), "10.0.0.1".into()]);
/// logger.info_fields("request", Fields::new().with("status", 200).with("path", "/"));
///
/// assert_eq!(
///     out.lines(),
///     vec![
///         "[INFO] User john logged in from 10.0.0.1",
///         "[INFO] request status=200 path=/",
///     ]
/// );
/// ```
#[derive(Clone)]
pub struct Logger {
    threshold: Arc<AtomicU8>,
    state: Arc<Mutex<LoggerState>>,
    /// Metrics for observability (written, dropped, fallbacks, rotations)
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Logger at `Debug` with the default layout, writing to stdout/stderr
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(
            LogLevel::Debug,
            DefaultRenderer::new(),
            None,
            Box::new(ConsoleSink::stdio()),
            Arc::new(LoggerMetrics::new()),
        )
    }

    fn from_parts(
        level: LogLevel,
        default_renderer: DefaultRenderer,
        custom: Option<Box<dyn Renderer>>,
        sink: Box<dyn Sink>,
        metrics: Arc<LoggerMetrics>,
    ) -> Self {
        Self {
            threshold: Arc::new(AtomicU8::new(level.as_u8())),
            state: Arc::new(Mutex::new(LoggerState {
                default_renderer,
                custom,
                sink,
                closed: false,
            })),
            metrics,
        }
    }

    /// Build a logger from deserialized settings
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for invalid rotation settings and an IO
    /// error when the configured file cannot be opened.
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Logger::builder()
            .level(config.level)
            .timestamp_format(config.timestamp_format.clone());
        if let Some(ref prefix) = config.prefix {
            builder = builder.prefix(prefix.clone());
        }
        if let Some(ref file) = config.file {
            builder = builder.file(file.path.clone(), file.rotation.to_policy());
        }
        builder.build()
    }

    pub fn set_level(&self, level: LogLevel) {
        let _state = self.state.lock();
        self.threshold.store(level.as_u8(), Ordering::Relaxed);
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.threshold.load(Ordering::Relaxed))
    }

    /// Whether a record at `level` would be written; takes no lock
    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level.as_u8() >= self.threshold.load(Ordering::Relaxed)
    }

    fn dispatch(&self, record: LogRecord) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        let line = state.render(&record, &self.metrics);
        state.write(record.level, &line, &self.metrics);
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.is_enabled(level) {
            return;
        }
        self.dispatch(LogRecord::new(level, message));
    }

    /// Log with `{}` markers replaced by `args` left to right
    pub fn log_args(&self, level: LogLevel, template: &str, args: &[LogValue]) {
        if !self.is_enabled(level) {
            return;
        }
        self.dispatch(LogRecord::with_args(level, template, args));
    }

    /// Log the message followed by `key=value` pairs in insertion order
    pub fn log_fields(&self, level: LogLevel, message: impl Into<String>, fields: Fields) {
        if !self.is_enabled(level) {
            return;
        }
        self.dispatch(LogRecord::new(level, message).with_fields(fields));
    }

    /// Log with fields given as an alternating `key, value, …` list
    ///
    /// # Errors
    ///
    /// Returns `InvalidFieldList` for an odd number of values, whatever the
    /// level; nothing is written in that case.
    pub fn log_flat<I>(&self, level: LogLevel, message: impl Into<String>, values: I) -> Result<()>
    where
        I: IntoIterator<Item = LogValue>,
    {
        let fields = Fields::from_flat(values)?;
        self.log_fields(level, message, fields);
        Ok(())
    }

    /// Log with an explicit source location
    pub fn log_at(&self, site: CallSite, level: LogLevel, message: impl Into<String>) {
        if !self.is_enabled(level) {
            return;
        }
        self.dispatch(LogRecord::new(level, message).with_call_site(site));
    }

    pub fn log_args_at(&self, site: CallSite, level: LogLevel, template: &str, args: &[LogValue]) {
        if !self.is_enabled(level) {
            return;
        }
        self.dispatch(LogRecord::with_args(level, template, args).with_call_site(site));
    }

    pub fn log_fields_at(
        &self,
        site: CallSite,
        level: LogLevel,
        message: impl Into<String>,
        fields: Fields,
    ) {
        if !self.is_enabled(level) {
            return;
        }
        self.dispatch(
            LogRecord::new(level, message)
                .with_fields(fields)
                .with_call_site(site),
        );
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn debug_args(&self, template: &str, args: &[LogValue]) {
        self.log_args(LogLevel::Debug, template, args);
    }

    #[inline]
    pub fn info_args(&self, template: &str, args: &[LogValue]) {
        self.log_args(LogLevel::Info, template, args);
    }

    #[inline]
    pub fn warning_args(&self, template: &str, args: &[LogValue]) {
        self.log_args(LogLevel::Warning, template, args);
    }

    #[inline]
    pub fn error_args(&self, template: &str, args: &[LogValue]) {
        self.log_args(LogLevel::Error, template, args);
    }

    #[inline]
    pub fn debug_fields(&self, message: impl Into<String>, fields: Fields) {
        self.log_fields(LogLevel::Debug, message, fields);
    }

    #[inline]
    pub fn info_fields(&self, message: impl Into<String>, fields: Fields) {
        self.log_fields(LogLevel::Info, message, fields);
    }

    #[inline]
    pub fn warning_fields(&self, message: impl Into<String>, fields: Fields) {
        self.log_fields(LogLevel::Warning, message, fields);
    }

    #[inline]
    pub fn error_fields(&self, message: impl Into<String>, fields: Fields) {
        self.log_fields(LogLevel::Error, message, fields);
    }

    /// Replace the active sink
    ///
    /// The previous sink is flushed and closed before the new one receives
    /// any write. Installing a sink also reopens a logger that was shut down.
    pub fn set_sink(&self, sink: Box<dyn Sink>) {
        let mut state = self.state.lock();
        state.close_sink();
        state.sink = sink;
        state.closed = false;
    }

    /// Write `Debug`/`Info` to `normal` and `Warning`/`Error` to `error`
    pub fn set_output_streams<N, E>(&self, normal: N, error: E)
    where
        N: Write + Send + 'static,
        E: Write + Send + 'static,
    {
        self.set_sink(Box::new(ConsoleSink::new(normal, error)));
    }

    /// Install a custom renderer, or restore the default layout with `None`
    pub fn set_formatter(&self, renderer: Option<Box<dyn Renderer>>) {
        let previous = {
            let mut state = self.state.lock();
            std::mem::replace(&mut state.custom, renderer)
        };
        drop(previous);
    }

    /// Replace the settings of the default layout (prefix, timestamp)
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for an unusable timestamp pattern; the
    /// current layout stays active.
    pub fn set_default_renderer(&self, renderer: DefaultRenderer) -> Result<()> {
        renderer.timestamp_format().validate()?;
        self.state.lock().default_renderer = renderer;
        Ok(())
    }

    /// Switch to a file sink that rotates by size
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` when `max_bytes` or `max_files` is zero
    /// or the path is empty; the previous sink stays active.
    pub fn set_file_logging<P: AsRef<Path>>(
        &self,
        path: P,
        max_bytes: u64,
        max_files: usize,
    ) -> Result<()> {
        self.set_file_sink(path, RotationPolicy::BySize { max_bytes, max_files })
    }

    /// Switch to a file sink that rotates by elapsed time
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a zero interval or file count; the
    /// previous sink stays active.
    pub fn set_file_logging_interval<P: AsRef<Path>>(
        &self,
        path: P,
        interval: Duration,
        max_files: usize,
    ) -> Result<()> {
        self.set_file_sink(path, RotationPolicy::ByInterval { interval, max_files })
    }

    /// Switch to a file sink with any rotation policy
    ///
    /// The file is opened before the current sink is touched, so a failure
    /// leaves the logger exactly as it was.
    pub fn set_file_sink<P: AsRef<Path>>(&self, path: P, policy: RotationPolicy) -> Result<()> {
        let sink = FileSink::open(path, policy)?.with_metrics(Arc::clone(&self.metrics));
        self.set_sink(Box::new(sink));
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        self.state.lock().sink.flush()
    }

    /// Flush and close the sink; later log calls are ignored until a new
    /// sink is installed
    pub fn shutdown(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Ok(());
        }
        state.closed = true;
        let result = state.sink.close();

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} dropped logs (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
        result
    }

    pub fn is_shut_down(&self) -> bool {
        self.state.lock().closed
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use interlaced_logger::{Logger, MemoryStream};
    ///
    /// let logger = Logger::new();
    /// logger.set_output_streams(MemoryStream::new(), MemoryStream::new());
    /// logger.info("counted");
    ///
    /// let metrics = logger.metrics();
    /// assert_eq!(metrics.total_written(), 1);
    /// assert_eq!(metrics.drop_rate(), 0.0);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Name of the active sink, e.g. `"console"` or `"file"`
    pub fn sink_name(&self) -> String {
        self.state.lock().sink.name().to_string()
    }

    /// Name of the active renderer
    pub fn formatter_name(&self) -> String {
        let state = self.state.lock();
        match state.custom {
            Some(ref custom) => custom.name().to_string(),
            None => state.default_renderer.name().to_string(),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use interlaced_logger::prelude::*;
///
/// let out = MemoryStream::new();
/// let logger = Logger::builder()
///     .level(LogLevel::Warning)
///     .prefix("api")
///     .output_streams(out.clone(), MemoryStream::new())
///     .build()
///     .unwrap();
///
/// logger.info("hidden");
/// assert_eq!(logger.level(), LogLevel::Warning);
/// assert!(out.contents().is_empty());
/// ```
pub struct LoggerBuilder {
    level: LogLevel,
    default_renderer: DefaultRenderer,
    custom: Option<Box<dyn Renderer>>,
    sink: Option<Box<dyn Sink>>,
    file: Option<(PathBuf, RotationPolicy)>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            level: LogLevel::Debug,
            default_renderer: DefaultRenderer::new(),
            custom: None,
            sink: None,
            file: None,
        }
    }

    /// Set the severity threshold
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Timestamp format of the default layout
    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.default_renderer = self.default_renderer.with_timestamp_format(format);
        self
    }

    /// Prefix of the default layout
    #[must_use = "builder methods return a new value"]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.default_renderer = self.default_renderer.with_prefix(prefix);
        self
    }

    /// Use a custom renderer instead of the default layout
    #[must_use = "builder methods return a new value"]
    pub fn formatter<R: Renderer + 'static>(mut self, renderer: R) -> Self {
        self.custom = Some(Box::new(renderer));
        self
    }

    /// Write to caller-supplied console streams
    #[must_use = "builder methods return a new value"]
    pub fn output_streams<N, E>(self, normal: N, error: E) -> Self
    where
        N: Write + Send + 'static,
        E: Write + Send + 'static,
    {
        self.sink(ConsoleSink::new(normal, error))
    }

    /// Write to an arbitrary sink
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self.file = None;
        self
    }

    /// Write to a rotating file, opened by [`build`](Self::build)
    #[must_use = "builder methods return a new value"]
    pub fn file(mut self, path: impl Into<PathBuf>, policy: RotationPolicy) -> Self {
        self.file = Some((path.into(), policy));
        self.sink = None;
        self
    }

    /// Build the Logger
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for an unusable timestamp pattern and
    /// an error when a requested file sink cannot be opened.
    pub fn build(self) -> Result<Logger> {
        self.default_renderer.timestamp_format().validate()?;
        let metrics = Arc::new(LoggerMetrics::new());

        let sink: Box<dyn Sink> = match (self.file, self.sink) {
            (Some((path, policy)), _) => {
                Box::new(FileSink::open(path, policy)?.with_metrics(Arc::clone(&metrics)))
            }
            (None, Some(sink)) => sink,
            (None, None) => Box::new(ConsoleSink::stdio()),
        };

        Ok(Logger::from_parts(
            self.level,
            self.default_renderer,
            self.custom,
            sink,
            metrics,
        ))
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LoggerError;
    use crate::core::renderer::FnRenderer;
    use crate::sinks::MemoryStream;
    use std::sync::atomic::AtomicUsize;

    fn capture() -> (Logger, MemoryStream, MemoryStream) {
        let out = MemoryStream::new();
        let err = MemoryStream::new();
        let logger = Logger::builder()
            .output_streams(out.clone(), err.clone())
            .build()
            .unwrap();
        (logger, out, err)
    }

    /// Sink whose writes always fail
    struct BrokenSink;

    impl Sink for BrokenSink {
        fn write(&mut self, _level: LogLevel, _line: &str) -> Result<()> {
            Err(LoggerError::other("disk on fire"))
        }
        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
        fn close(&mut self) -> Result<()> {
            Ok(())
        }
        fn name(&self) -> &str {
            "broken"
        }
    }

    #[test]
    fn test_defaults() {
        let logger = Logger::new();
        assert_eq!(logger.level(), LogLevel::Debug);
        assert_eq!(logger.sink_name(), "console");
        assert_eq!(logger.formatter_name(), "default");
    }

    #[test]
    fn test_threshold_filters_without_rendering() {
        let (logger, out, err) = capture();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        logger.set_formatter(Some(Box::new(FnRenderer::new(move |record: &LogRecord| {
            counter.fetch_add(1, Ordering::SeqCst);
            record.message.clone()
        }))));

        logger.set_level(LogLevel::Warning);
        logger.debug("d");
        logger.info("i");
        logger.warning("w");
        logger.error("e");

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(out.contents().is_empty());
        assert_eq!(err.lines(), vec!["w", "e"]);
    }

    #[test]
    fn test_formatter_swap_and_restore() {
        let (logger, out, _err) = capture();

        logger.set_formatter(Some(Box::new(FnRenderer::new(|record: &LogRecord| {
            format!("[Custom] {}", record.message)
        }))));
        logger.info("one");
        assert_eq!(logger.formatter_name(), "fn");

        logger.set_formatter(None);
        logger.info("two");

        assert_eq!(out.lines(), vec!["[Custom] one", "[INFO] two"]);
    }

    #[test]
    fn test_renderer_failure_falls_back() {
        let (logger, out, _err) = capture();
        logger.set_formatter(Some(Box::new(FnRenderer::new(|_: &LogRecord| -> String {
            panic!("renderer bug")
        }))));

        logger.info_args("value {}", &[7.into()]);
        logger.info("still logging");

        assert_eq!(out.lines(), vec!["[INFO] value 7", "[INFO] still logging"]);
        assert_eq!(logger.metrics().renderer_fallbacks(), 2);
        assert_eq!(logger.metrics().total_written(), 2);
    }

    #[test]
    fn test_sink_failure_is_counted_not_raised() {
        let logger = Logger::builder().sink(BrokenSink).build().unwrap();
        logger.error("lost");
        logger.error("lost again");

        assert_eq!(logger.metrics().dropped_count(), 2);
        assert_eq!(logger.metrics().total_written(), 0);
    }

    #[test]
    fn test_log_flat_rejects_odd_list() {
        let (logger, out, _err) = capture();

        let err = logger
            .log_flat(LogLevel::Info, "bad", vec!["k1".into(), 1.into(), "k2".into()])
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidFieldList { count: 3 }));
        assert!(out.contents().is_empty());

        logger
            .log_flat(LogLevel::Info, "good", vec!["k1".into(), 1.into(), "k2".into(), "two".into()])
            .unwrap();
        assert_eq!(out.lines(), vec!["[INFO] good k1=1 k2=two"]);
    }

    #[test]
    fn test_log_at_includes_location() {
        let (logger, out, _err) = capture();
        logger.log_at(CallSite::new("src/net/server.rs", 88), LogLevel::Info, "listening");
        assert_eq!(out.lines(), vec!["[INFO] listening [server.rs:88]"]);
    }

    #[test]
    fn test_invalid_file_config_keeps_previous_sink() {
        let (logger, out, _err) = capture();

        let err = logger.set_file_logging("app.log", 0, 2).unwrap_err();
        assert!(err.is_configuration());
        assert!(logger.set_file_logging("app.log", 1024, 0).is_err());
        assert!(logger.set_file_logging("", 1024, 2).is_err());

        logger.info("still console");
        assert_eq!(logger.sink_name(), "console");
        assert_eq!(out.lines(), vec!["[INFO] still console"]);
    }

    #[test]
    fn test_shutdown_ignores_later_calls() {
        let (logger, out, _err) = capture();
        logger.info("before");
        logger.shutdown().unwrap();
        logger.info("after");

        assert!(logger.is_shut_down());
        assert_eq!(out.lines(), vec!["[INFO] before"]);
        assert_eq!(logger.metrics().dropped_count(), 0);

        // A new sink reopens the logger
        let again = MemoryStream::new();
        logger.set_output_streams(again.clone(), MemoryStream::new());
        logger.info("reopened");
        assert_eq!(again.lines(), vec!["[INFO] reopened"]);
    }

    #[test]
    fn test_clones_share_state() {
        let (logger, out, _err) = capture();
        let clone = logger.clone();
        clone.set_level(LogLevel::Error);

        logger.warning("filtered");
        assert_eq!(logger.level(), LogLevel::Error);
        assert!(out.contents().is_empty());
    }

    #[test]
    fn test_builder_prefix_and_timestamp() {
        let out = MemoryStream::new();
        let logger = Logger::builder()
            .prefix("svc")
            .timestamp_format(TimestampFormat::Unix)
            .output_streams(out.clone(), MemoryStream::new())
            .build()
            .unwrap();

        logger.info("hello");
        let line = out.lines().remove(0);
        assert!(line.starts_with("svc ["), "{}", line);
        assert!(line.ends_with("] [INFO] hello"), "{}", line);
    }

    #[test]
    fn test_bad_timestamp_pattern_is_rejected() {
        let err = Logger::builder()
            .timestamp_format(TimestampFormat::Custom("%Q".into()))
            .output_streams(MemoryStream::new(), MemoryStream::new())
            .build()
            .unwrap_err();
        assert!(err.is_configuration());

        let (logger, out, _err) = capture();
        let bad = DefaultRenderer::new().with_timestamp_format(TimestampFormat::Custom("%Q".into()));
        assert!(logger.set_default_renderer(bad).is_err());

        logger
            .set_default_renderer(DefaultRenderer::new().with_prefix("svc"))
            .unwrap();
        logger.info("hello");
        assert_eq!(out.lines(), vec!["svc [INFO] hello"]);
    }

    #[test]
    fn test_unvalidated_timestamp_pattern_does_not_panic() {
        let (logger, out, _err) = capture();
        // A renderer installed directly skips validation
        logger.set_formatter(Some(Box::new(
            DefaultRenderer::new().with_timestamp_format(TimestampFormat::Custom("%Q".into())),
        )));

        let result = catch_unwind(AssertUnwindSafe(|| logger.info("hello")));
        assert!(result.is_ok());

        let line = out.lines().remove(0);
        assert!(line.starts_with('['), "{}", line);
        assert!(line.ends_with("] [INFO] hello"), "{}", line);
        assert_eq!(logger.metrics().renderer_fallbacks(), 0);
    }

    #[test]
    fn test_custom_renderer_output_stays_on_one_line() {
        let (logger, out, _err) = capture();
        logger.set_formatter(Some(Box::new(FnRenderer::new(|record: &LogRecord| {
            format!("{}\nforged", record.message)
        }))));

        logger.info("real");
        assert_eq!(out.lines(), vec!["real\\nforged"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_failing_file_write_is_dropped_and_counted() {
        let device = Path::new("/dev/full");
        if !device.exists() {
            return;
        }

        let logger = Logger::new();
        logger.set_file_sink(device, RotationPolicy::None).unwrap();
        logger.error("no space");
        logger.info("no space either");

        assert_eq!(logger.metrics().dropped_count(), 2);
        assert_eq!(logger.metrics().total_written(), 0);
        assert_eq!(logger.sink_name(), "file");
    }
}
