//! Sink trait for log output destinations

use super::{error::Result, severity::Severity};

/// A destination for formatted lines.
///
/// `line` is already fully formatted and newline-terminated; `severity` is
/// passed along for sinks that decorate the label.
pub trait Sink: Send {
    fn write_line(&mut self, severity: Severity, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
