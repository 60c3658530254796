//! Main logger implementation

use super::{
    config::{ConfigStore, SinkConfiguration},
    delivery::{DeliveryMode, DeliveryStrategy, Dispatcher},
    error::Result,
    message::LogMessage,
    metrics::LoggerMetrics,
    severity::Severity,
    sink::Sink,
};
use crate::sinks::ConsoleSink;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default shutdown timeout for logger cleanup (5 seconds)
///
/// This timeout is used when the logger is dropped without explicit shutdown.
/// For custom timeout control, use the `shutdown()` method instead.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Fire-and-forget message logger.
///
/// Callers only pay for a timestamp and a queue insert; formatting and I/O
/// happen on the delivery side. Configuration can change at any time and
/// takes effect from the next delivered message.
///
/// # Example
///
/// ```no_run
/// use message_logger::Logger;
///
/// let logger = Logger::new().unwrap();
/// logger.configure_file(true, "app.log");
/// logger.info("service started");
/// logger.warn("cache is cold");
/// ```
pub struct Logger {
    config: Arc<ConfigStore>,
    strategy: Box<dyn DeliveryStrategy>,
    dispatcher: Arc<Dispatcher>,
    metrics: Arc<LoggerMetrics>,
    /// Held while stamping and enqueueing so capture order equals queue order
    intake: Mutex<()>,
    mode: DeliveryMode,
    stopped: AtomicBool,
}

impl Logger {
    /// Ordered logger writing to the console with default timestamps
    pub fn new() -> Result<Self> {
        LoggerBuilder::new().build()
    }

    /// Build a logger from a JSON [`SinkConfiguration`] file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = SinkConfiguration::from_json_file(path)?;
        LoggerBuilder::new().configuration(config).build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use message_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .delivery_mode(DeliveryMode::Ordered)
    ///     .console(false)
    ///     .timestamp(true, true)
    ///     .build()
    ///     .unwrap();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn log(&self, severity: Severity, text: impl Into<String>) {
        let text = text.into();
        let _intake = self.intake.lock();
        self.strategy.submit(LogMessage::new(severity, text));
    }

    /// Write `text` to every active sink exactly as given.
    ///
    /// No timestamp, label or newline is added. Raw lines share the queue
    /// with formatted ones, so ordering is the same as for [`Logger::log`].
    pub fn log_raw(&self, text: impl Into<String>) {
        let text = text.into();
        let _intake = self.intake.lock();
        self.strategy.submit(LogMessage::raw(text));
    }

    #[inline]
    pub fn info(&self, text: impl Into<String>) {
        self.log(Severity::Info, text);
    }

    #[inline]
    pub fn warn(&self, text: impl Into<String>) {
        self.log(Severity::Warning, text);
    }

    #[inline]
    pub fn error(&self, text: impl Into<String>) {
        self.log(Severity::Error, text);
    }

    /// Enable or disable standard output
    pub fn configure_console(&self, enabled: bool) {
        self.config.set_console(enabled);
    }

    /// Add or remove a file sink.
    ///
    /// Pass `enabled = false` with an empty `path` to remove every file sink.
    /// An empty `path` with `enabled = true` uses [`DEFAULT_LOG_FILE`](crate::DEFAULT_LOG_FILE).
    pub fn configure_file(&self, enabled: bool, path: &str) {
        self.config.set_file(enabled, path);
    }

    /// Set both timestamp flags at once
    pub fn configure_timestamp(&self, show_date: bool, show_milliseconds: bool) {
        self.config.set_timestamp_options(show_date, show_milliseconds);
    }

    /// Replace the whole configuration in one step
    pub fn reconfigure(&self, config: SinkConfiguration) {
        self.config.replace(config);
    }

    /// Snapshot of the current configuration
    pub fn configuration(&self) -> SinkConfiguration {
        self.config.snapshot()
    }

    pub fn delivery_mode(&self) -> DeliveryMode {
        self.mode
    }

    /// Get the logger metrics
    ///
    /// # Example
    ///
    /// ```
    /// use message_logger::Logger;
    /// use std::time::Duration;
    ///
    /// let logger = Logger::builder().console(false).build().unwrap();
    /// logger.info("counted");
    /// logger.drain(Duration::from_secs(1));
    /// assert_eq!(logger.metrics().delivered(), 1);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Wait until every message logged so far has been delivered
    ///
    /// Returns `false` if `timeout` expired first.
    pub fn drain(&self, timeout: Duration) -> bool {
        self.strategy.drain(timeout)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Gracefully shutdown the logger with a custom timeout
    ///
    /// Pending messages are delivered before the delivery threads stop.
    /// Messages logged afterwards are discarded and counted as rejected.
    /// Calling this more than once is harmless.
    ///
    /// **Note**: When the logger is dropped without calling `shutdown()` explicitly,
    /// it uses [`DEFAULT_SHUTDOWN_TIMEOUT`].
    ///
    /// # Returns
    ///
    /// `true` if shutdown completed within timeout, `false` otherwise
    pub fn shutdown(&self, timeout: Duration) -> bool {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return true;
        }

        // A producer inside `log` finishes its submit before the strategy stops accepting
        let completed = {
            let _intake = self.intake.lock();
            self.strategy.stop(timeout)
        };

        let failures = self.metrics.sink_failures();
        if failures > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} failed sink writes (failure rate: {:.2}%)",
                failures,
                self.metrics.failure_rate()
            );
        }

        completed
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("mode", &self.mode)
            .field("strategy", &self.strategy.name())
            .field("config", &self.config.snapshot())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use message_logger::prelude::*;
///
/// let capture = MemorySink::new();
/// let logger = Logger::builder()
///     .delivery_mode(DeliveryMode::Detached)
///     .console_sink(capture.clone())
///     .timestamp(false, true)
///     .build()
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    config: SinkConfiguration,
    mode: DeliveryMode,
    console_sink: Option<Box<dyn Sink>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: SinkConfiguration::default(),
            mode: DeliveryMode::default(),
            console_sink: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn delivery_mode(mut self, mode: DeliveryMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn console(mut self, enabled: bool) -> Self {
        self.config.set_console(enabled);
        self
    }

    /// Add a file sink
    #[must_use = "builder methods return a new value"]
    pub fn file(mut self, path: &str) -> Self {
        self.config.set_file(true, path);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp(mut self, show_date: bool, show_milliseconds: bool) -> Self {
        self.config.set_timestamp_options(show_date, show_milliseconds);
        self
    }

    /// Start from a complete configuration
    #[must_use = "builder methods return a new value"]
    pub fn configuration(mut self, config: SinkConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Replace the stdout writer used for the console sink
    #[must_use = "builder methods return a new value"]
    pub fn console_sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.console_sink = Some(Box::new(sink));
        self
    }

    /// Build the Logger and start its delivery strategy
    pub fn build(self) -> Result<Logger> {
        let config = Arc::new(ConfigStore::new(self.config));
        let metrics = Arc::new(LoggerMetrics::new());
        let console = self
            .console_sink
            .unwrap_or_else(|| Box::new(ConsoleSink::new()));

        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&config),
            console,
            Arc::clone(&metrics),
        ));
        let strategy = self.mode.start(Arc::clone(&dispatcher))?;

        Ok(Logger {
            config,
            strategy,
            dispatcher,
            metrics,
            intake: Mutex::new(()),
            mode: self.mode,
            stopped: AtomicBool::new(false),
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "log-facade")]
impl log::Log for Logger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        !self.is_stopped()
    }

    fn log(&self, record: &log::Record<'_>) {
        Logger::log(self, Severity::from(record.level()), record.args().to_string());
    }

    fn flush(&self) {
        self.strategy.drain(DEFAULT_SHUTDOWN_TIMEOUT);
        if let Err(e) = self.dispatcher.flush_console() {
            eprintln!("[LOGGER ERROR] Failed to flush console sink: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;

    const WAIT: Duration = Duration::from_secs(5);

    struct SlowCapture(MemorySink);

    impl Sink for SlowCapture {
        fn write_line(&mut self, severity: Severity, line: &str) -> Result<()> {
            std::thread::sleep(Duration::from_millis(5));
            self.0.write_line(severity, line)
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "slow-capture"
        }
    }

    fn capturing(mode: DeliveryMode) -> (Logger, MemorySink) {
        let capture = MemorySink::new();
        let logger = Logger::builder()
            .delivery_mode(mode)
            .console_sink(capture.clone())
            .build()
            .expect("build logger");
        (logger, capture)
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().console(false).build().expect("build logger");
        assert_eq!(logger.delivery_mode(), DeliveryMode::Ordered);
        assert_eq!(logger.configuration().active_files.len(), 0);
        assert!(!logger.is_stopped());
    }

    #[test]
    fn test_builder_full_configuration() {
        let logger = Logger::builder()
            .delivery_mode(DeliveryMode::Detached)
            .console(false)
            .file("a.txt")
            .file("a.txt")
            .timestamp(true, false)
            .build()
            .expect("build logger");

        let config = logger.configuration();
        assert!(!config.console_enabled);
        assert_eq!(config.active_files, vec!["a.txt".to_string()]);
        assert!(config.timestamp.show_date);
        assert!(!config.timestamp.show_milliseconds);
        assert_eq!(logger.delivery_mode(), DeliveryMode::Detached);
    }

    #[test]
    fn test_convenience_wrappers_set_severity() {
        let (logger, capture) = capturing(DeliveryMode::Ordered);
        logger.info("i");
        logger.warn("w");
        logger.error("e");
        assert!(logger.drain(WAIT));

        let lines = capture.lines();
        assert!(lines[0].ends_with(" [INFO] i\n"));
        assert!(lines[1].ends_with(" [WARNING] w\n"));
        assert!(lines[2].ends_with(" [ERROR] e\n"));
    }

    #[test]
    fn test_timestamp_reconfiguration_applies_to_later_messages() {
        let (logger, capture) = capturing(DeliveryMode::Ordered);
        logger.configure_timestamp(false, false);
        logger.info("short");
        assert!(logger.drain(WAIT));
        logger.configure_timestamp(true, true);
        logger.info("long");
        assert!(logger.drain(WAIT));

        let lines = capture.lines();
        // HH:MM:SS
        assert_eq!(lines[0].find(' '), Some(8));
        // YYYY-MM-DD HH:MM:SS.mmm
        assert_eq!(lines[1].find(" [INFO]"), Some(23));
    }

    #[test]
    fn test_shutdown_is_idempotent_and_rejects_later_messages() {
        let (logger, capture) = capturing(DeliveryMode::Ordered);
        logger.info("before");
        assert!(logger.shutdown(WAIT));
        assert!(logger.shutdown(WAIT));
        assert!(logger.is_stopped());

        logger.info("after");
        assert_eq!(capture.len(), 1);
        assert_eq!(logger.metrics().rejected(), 1);
    }

    #[test]
    fn test_shutdown_during_concurrent_logging_leaves_nothing_running() {
        const PRODUCERS: usize = 4;
        const PER_PRODUCER: usize = 200;

        let (logger, capture) = capturing(DeliveryMode::Detached);
        let logger = Arc::new(logger);

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let logger = Arc::clone(&logger);
                std::thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        logger.info(format!("p{} m{}", p, i));
                    }
                })
            })
            .collect();

        std::thread::sleep(Duration::from_millis(2));
        assert!(logger.shutdown(WAIT));
        let written_at_shutdown = capture.len();

        for producer in producers {
            producer.join().expect("producer panicked");
        }
        std::thread::sleep(Duration::from_millis(50));

        let metrics = logger.metrics();
        assert_eq!(capture.len(), written_at_shutdown);
        assert_eq!(metrics.delivered(), metrics.submitted());
        assert_eq!(
            metrics.submitted() + metrics.rejected(),
            (PRODUCERS * PER_PRODUCER) as u64
        );
    }

    #[test]
    fn test_drain_after_metrics_reset() {
        let capture = MemorySink::new();
        let logger = Logger::builder()
            .console_sink(SlowCapture(capture.clone()))
            .build()
            .expect("build logger");

        for i in 0..10 {
            logger.info(format!("before reset {}", i));
        }
        logger.metrics().reset();
        for i in 0..10 {
            logger.info(format!("after reset {}", i));
        }

        assert!(logger.drain(WAIT));
        assert_eq!(capture.len(), 20);
    }

    #[test]
    fn test_log_raw_keeps_queue_order() {
        let (logger, capture) = capturing(DeliveryMode::Ordered);
        logger.info("first");
        logger.log_raw("--- raw ---\n");
        logger.log_raw("no newline");
        logger.error("last");
        assert!(logger.drain(WAIT));

        let lines = capture.lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with(" [INFO] first\n"));
        assert_eq!(lines[1], "--- raw ---\n");
        assert_eq!(lines[2], "no newline");
        assert!(lines[3].ends_with(" [ERROR] last\n"));
    }

    #[test]
    fn test_drop_drains_pending_messages() {
        let capture = MemorySink::new();
        {
            let logger = Logger::builder()
                .console_sink(capture.clone())
                .build()
                .expect("build logger");
            for i in 0..50 {
                logger.info(format!("Message {}", i));
            }
        }
        assert_eq!(capture.len(), 50);
    }

    #[test]
    fn test_reconfigure_replaces_everything() {
        let (logger, _capture) = capturing(DeliveryMode::Ordered);
        let mut config = SinkConfiguration::default();
        config.set_console(false);
        config.set_file(true, "b.txt");
        logger.reconfigure(config.clone());
        assert_eq!(logger.configuration(), config);
    }

    #[test]
    fn test_debug_output_names_strategy() {
        let (logger, _capture) = capturing(DeliveryMode::Detached);
        let debug = format!("{:?}", logger);
        assert!(debug.contains("detached"));
    }

    #[cfg(feature = "log-facade")]
    #[test]
    fn test_log_trait_maps_levels() {
        use log::Log;

        let (logger, capture) = capturing(DeliveryMode::Ordered);
        Log::log(
            &logger,
            &log::Record::builder()
                .level(log::Level::Warn)
                .args(format_args!("via facade {}", 1))
                .build(),
        );
        Log::flush(&logger);

        let lines = capture.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(" [WARNING] via facade 1\n"));
    }
}
