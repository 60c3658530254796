//! Message severity labels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity attached to every message.
///
/// Severity is only a label: every active sink receives every message
/// regardless of its severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Info, Severity::Warning, Severity::Error];

    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }

    /// Label as it appears in a delivered line, e.g. `[WARNING]`
    pub fn bracketed(&self) -> &'static str {
        match self {
            Severity::Info => "[INFO]",
            Severity::Warning => "[WARNING]",
            Severity::Error => "[ERROR]",
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::Info => Green,
            Severity::Warning => Yellow,
            Severity::Error => Red,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INFO" => Ok(Severity::Info),
            "WARN" | "WARNING" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}

#[cfg(feature = "log-facade")]
impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warning,
            log::Level::Info | log::Level::Debug | log::Level::Trace => Severity::Info,
        }
    }
}
