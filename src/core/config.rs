//! Sink configuration and its shared store
//!
//! The delivery engine reads one consistent snapshot per message, so a
//! message is never formatted under one configuration and written under another.

use super::error::{LoggerError, Result};
use super::timestamp::TimestampOptions;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name used when a file sink is enabled without a path
pub const DEFAULT_LOG_FILE: &str = "log.txt";

/// Which sinks are active and how timestamps look
///
/// # Example
///
/// ```
/// use message_logger::SinkConfiguration;
///
/// let config = SinkConfiguration::from_json_str(
///     r#"{ "console_enabled": false, "active_files": ["app.log"] }"#,
/// ).unwrap();
/// assert!(!config.console_enabled);
/// assert_eq!(config.active_files, vec!["app.log".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfiguration {
    pub console_enabled: bool,
    /// Unique paths, most recently enabled first
    pub active_files: Vec<String>,
    pub timestamp: TimestampOptions,
}

impl Default for SinkConfiguration {
    fn default() -> Self {
        Self {
            console_enabled: true,
            active_files: Vec::new(),
            timestamp: TimestampOptions::default(),
        }
    }
}

impl SinkConfiguration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration; duplicate paths are collapsed
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut config: SinkConfiguration = serde_json::from_str(json)?;
        config.normalize();
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| LoggerError::config_read(path.display().to_string(), e))?;
        Self::from_json_str(&json)
    }

    pub fn set_console(&mut self, enabled: bool) {
        self.console_enabled = enabled;
    }

    /// Add, remove or clear file sinks.
    ///
    /// * `enabled` with a path: add it (re-adding moves it to the front).
    /// * `enabled` with an empty path: add [`DEFAULT_LOG_FILE`].
    /// * not `enabled` with an empty path: clear every file sink.
    /// * not `enabled` with a path: remove only that path.
    pub fn set_file(&mut self, enabled: bool, path: &str) {
        if enabled {
            let path = if path.is_empty() { DEFAULT_LOG_FILE } else { path };
            self.active_files.retain(|p| p != path);
            self.active_files.insert(0, path.to_string());
        } else if path.is_empty() {
            self.active_files.clear();
        } else {
            self.active_files.retain(|p| p != path);
        }
    }

    pub fn set_timestamp_options(&mut self, show_date: bool, show_milliseconds: bool) {
        self.timestamp = TimestampOptions::new(show_date, show_milliseconds);
    }

    #[must_use]
    pub fn has_active_sinks(&self) -> bool {
        self.console_enabled || !self.active_files.is_empty()
    }

    fn normalize(&mut self) {
        let mut seen = Vec::with_capacity(self.active_files.len());
        for path in self.active_files.drain(..) {
            if !path.is_empty() && !seen.contains(&path) {
                seen.push(path);
            }
        }
        self.active_files = seen;
    }
}

/// Process-lifetime configuration shared between callers and the delivery engine
///
/// Every mutation and every read goes through a single lock.
#[derive(Debug, Default)]
pub struct ConfigStore {
    inner: RwLock<SinkConfiguration>,
}

impl ConfigStore {
    pub fn new(config: SinkConfiguration) -> Self {
        Self {
            inner: RwLock::new(config),
        }
    }

    /// Owned copy of the configuration as of now
    pub fn snapshot(&self) -> SinkConfiguration {
        self.inner.read().clone()
    }

    pub fn set_console(&self, enabled: bool) {
        self.inner.write().set_console(enabled);
    }

    pub fn set_file(&self, enabled: bool, path: &str) {
        self.inner.write().set_file(enabled, path);
    }

    pub fn set_timestamp_options(&self, show_date: bool, show_milliseconds: bool) {
        self.inner
            .write()
            .set_timestamp_options(show_date, show_milliseconds);
    }

    pub fn replace(&self, config: SinkConfiguration) {
        *self.inner.write() = config;
    }
}
