//! # Message Logger
//!
//! A process-local message logger. Callers submit short text messages tagged
//! with a [`Severity`]; the logger timestamps them, formats them uniformly and
//! writes them to standard output and any number of text files.
//!
//! ## Features
//!
//! - **Non-blocking intake**: `log` only stamps the message and queues it
//! - **Ordered delivery**: one background worker writes lines in submission order
//! - **Detached delivery**: optional thread-per-message mode for lower latency
//! - **Live reconfiguration**: sinks and timestamp options change at any time
//! - **Isolated sinks**: a failing file never stops the others

pub mod core;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        DeliveryMode, DeliveryStrategy, LogMessage, Logger, LoggerBuilder, LoggerError,
        LoggerMetrics, Result, Severity, Sink, SinkConfiguration, TimestampOptions,
        DEFAULT_LOG_FILE, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::sinks::{ConsoleSink, FileSink, MemorySink};
}

pub use crate::core::{
    format_timestamp, ConfigStore, DeliveryMode, DeliveryStrategy, DetachedDelivery, Dispatcher,
    LogMessage, Logger, LoggerBuilder, LoggerError, LoggerMetrics, OrderedWorker, Result,
    Severity, Sink, SinkConfiguration, TimestampOptions, DEFAULT_LOG_FILE,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use sinks::{ConsoleSink, FileSink, MemorySink};
