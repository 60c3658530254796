//! Core logger types and traits

pub mod config;
pub mod delivery;
pub mod error;
pub mod logger;
pub mod message;
pub mod metrics;
pub mod severity;
pub mod sink;
pub mod timestamp;

pub use config::{ConfigStore, SinkConfiguration, DEFAULT_LOG_FILE};
pub use delivery::{
    DeliveryMode, DeliveryStrategy, DetachedDelivery, Dispatcher, OrderedWorker, IDLE_BACKOFF,
};
pub use error::{LoggerError, Result};
pub use logger::{Logger, LoggerBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use message::LogMessage;
pub use metrics::LoggerMetrics;
pub use severity::Severity;
pub use sink::Sink;
pub use timestamp::{format_timestamp, TimestampOptions};
