//! Console sink implementation

use crate::core::{LoggerError, Result, Severity, Sink};
#[cfg(feature = "console")]
use colored::Colorize;
use std::borrow::Cow;
use std::io::Write;

/// Writes lines to standard output
pub struct ConsoleSink {
    use_colors: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self { use_colors: false }
    }

    /// Colour the severity label when the `console` feature is enabled
    ///
    /// # Example
    ///
    /// ```
    /// use message_logger::sinks::ConsoleSink;
    ///
    /// let sink = ConsoleSink::with_colors(true);
    /// ```
    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Bytes that go to stdout for `line`
    fn render<'a>(&self, severity: Severity, line: &'a str) -> Cow<'a, str> {
        if self.use_colors {
            Cow::Owned(self.decorate(severity, line))
        } else {
            Cow::Borrowed(line)
        }
    }

    #[cfg(feature = "console")]
    fn decorate(&self, severity: Severity, line: &str) -> String {
        let label = severity.bracketed();
        let colored_label = label.color(severity.color_code()).to_string();
        line.replacen(label, &colored_label, 1)
    }

    #[cfg(not(feature = "console"))]
    fn decorate(&self, _severity: Severity, line: &str) -> String {
        line.to_string()
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write_line(&mut self, severity: Severity, line: &str) -> Result<()> {
        let rendered = self.render(severity, line);
        std::io::stdout()
            .lock()
            .write_all(rendered.as_bytes())
            .map_err(LoggerError::ConsoleSink)
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush().map_err(LoggerError::ConsoleSink)
    }

    fn name(&self) -> &str {
        "console"
    }
}
