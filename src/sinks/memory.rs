//! In-memory sink, mostly useful for tests and embedding applications

use crate::core::{Result, Severity, Sink};
use parking_lot::Mutex;
use std::sync::Arc;

/// Collects delivered lines in memory.
///
/// Clones share the same buffer, so keep one clone to inspect what a
/// logger wrote through the other.
///
/// # Example
///
/// ```
/// use message_logger::sinks::MemorySink;
/// use message_logger::Logger;
/// use std::time::Duration;
///
/// let capture = MemorySink::new();
/// let logger = Logger::builder().console_sink(capture.clone()).build().unwrap();
/// logger.info("hello");
/// logger.drain(Duration::from_secs(1));
/// assert!(capture.lines()[0].ends_with("[INFO] hello\n"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every line received so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write_line(&mut self, _severity: Severity, line: &str) -> Result<()> {
        self.lines.lock().push(line.to_string());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
