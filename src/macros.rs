//! Logging macros for ergonomic message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`.
//!
//! # Examples
//!
//! ```
//! use message_logger::prelude::*;
//! use message_logger::info;
//!
//! let logger = Logger::builder().console(false).build().unwrap();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use message_logger::prelude::*;
/// # let logger = Logger::builder().console(false).build().unwrap();
/// use message_logger::log;
/// log!(logger, Severity::Info, "Simple message");
/// log!(logger, Severity::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log($severity, format!($($arg)+))
    };
}

/// Log an info message.
///
/// # Examples
///
/// ```
/// # use message_logger::prelude::*;
/// # let logger = Logger::builder().console(false).build().unwrap();
/// use message_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg)+)
    };
}

/// Log a warning.
///
/// # Examples
///
/// ```
/// # use message_logger::prelude::*;
/// # let logger = Logger::builder().console(false).build().unwrap();
/// use message_logger::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warning, $($arg)+)
    };
}

/// Log an error.
///
/// # Examples
///
/// ```
/// # use message_logger::prelude::*;
/// # let logger = Logger::builder().console(false).build().unwrap();
/// use message_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}
