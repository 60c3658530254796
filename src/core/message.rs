//! Log message structure and line assembly

use super::severity::Severity;
use super::timestamp::TimestampOptions;
use chrono::{DateTime, Utc};

/// A message captured at the intake.
///
/// Immutable once created; ownership moves through the delivery queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    capture_time: DateTime<Utc>,
    severity: Severity,
    text: String,
    /// Written verbatim, without timestamp or label
    raw: bool,
}

impl LogMessage {
    /// Capture `text` with the current time
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self::at(Utc::now(), severity, text)
    }

    /// Build a message with an explicit capture time
    pub fn at(capture_time: DateTime<Utc>, severity: Severity, text: impl Into<String>) -> Self {
        Self {
            capture_time,
            severity,
            text: text.into(),
            raw: false,
        }
    }

    /// An already formatted line.
    ///
    /// Sinks receive `text` exactly as given: no timestamp, no label and no
    /// newline is added.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            capture_time: Utc::now(),
            severity: Severity::Info,
            text: text.into(),
            raw: true,
        }
    }

    pub fn capture_time(&self) -> DateTime<Utc> {
        self.capture_time
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// Render `<timestamp> [<SEVERITY>] <text>` terminated by exactly one newline.
    ///
    /// The timestamp uses the process's local time zone. Raw messages come
    /// back unchanged.
    pub fn format_line(&self, options: TimestampOptions) -> String {
        if self.raw {
            return self.text.clone();
        }
        let timestamp = options.format(&self.capture_time);
        assemble_line(&timestamp, self.severity, &self.text)
    }
}

pub(crate) fn assemble_line(timestamp: &str, severity: Severity, text: &str) -> String {
    let label = severity.bracketed();
    let mut line = String::with_capacity(timestamp.len() + label.len() + text.len() + 3);
    line.push_str(timestamp);
    line.push(' ');
    line.push_str(label);
    line.push(' ');
    line.push_str(text);
    if !line.ends_with('\n') {
        line.push('\n');
    }
    line
}
