//! Timestamp formatting utilities
//!
//! Timestamps always carry local wall-clock `HH:MM:SS`, optionally preceded by
//! the date (`YYYY-MM-DD `) and followed by milliseconds (`.mmm`).

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp verbosity flags
///
/// # Examples
///
/// ```
/// use message_logger::core::TimestampOptions;
///
/// let options = TimestampOptions::new(true, false);
/// assert!(options.show_date);
/// assert!(!options.show_milliseconds);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestampOptions {
    /// Prepend `YYYY-MM-DD `
    pub show_date: bool,
    /// Append `.mmm`
    pub show_milliseconds: bool,
}

impl Default for TimestampOptions {
    fn default() -> Self {
        Self {
            show_date: false,
            show_milliseconds: true,
        }
    }
}

impl TimestampOptions {
    #[must_use]
    pub const fn new(show_date: bool, show_milliseconds: bool) -> Self {
        Self {
            show_date,
            show_milliseconds,
        }
    }

    /// Format a capture time in the process's local time zone
    #[must_use]
    pub fn format(&self, capture_time: &DateTime<Utc>) -> String {
        self.format_in(&capture_time.with_timezone(&Local))
    }

    /// Format a time already expressed in some time zone
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use message_logger::core::TimestampOptions;
    ///
    /// let time = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
    /// assert_eq!(TimestampOptions::new(true, true).format_in(&time), "2025-01-08 10:30:45.000");
    /// ```
    #[must_use]
    pub fn format_in<Tz>(&self, time: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut out = if self.show_date {
            time.format("%Y-%m-%d %H:%M:%S").to_string()
        } else {
            time.format("%H:%M:%S").to_string()
        };

        if self.show_milliseconds {
            // Leap seconds report sub-second values past 999
            let millis = time.timestamp_subsec_millis().min(999);
            out.push_str(&format!(".{:03}", millis));
        }

        out
    }
}

/// Format `capture_time` in local time with the given verbosity
#[must_use]
pub fn format_timestamp(capture_time: &DateTime<Utc>, show_date: bool, show_milliseconds: bool) -> String {
    TimestampOptions::new(show_date, show_milliseconds).format(capture_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn fixed_datetime(micros: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(micros)
    }

    #[test]
    fn test_time_only() {
        let options = TimestampOptions::new(false, false);
        assert_eq!(options.format_in(&fixed_datetime(123_456)), "10:30:45");
    }

    #[test]
    fn test_with_milliseconds() {
        let options = TimestampOptions::new(false, true);
        assert_eq!(options.format_in(&fixed_datetime(123_456)), "10:30:45.123");
    }

    #[test]
    fn test_with_date_and_milliseconds() {
        let options = TimestampOptions::new(true, true);
        assert_eq!(
            options.format_in(&fixed_datetime(123_456)),
            "2025-01-08 10:30:45.123"
        );
    }

    #[test]
    fn test_with_date_only() {
        let options = TimestampOptions::new(true, false);
        assert_eq!(options.format_in(&fixed_datetime(0)), "2025-01-08 10:30:45");
    }

    #[test]
    fn test_milliseconds_zero_padded() {
        let options = TimestampOptions::new(false, true);
        assert_eq!(options.format_in(&fixed_datetime(0)), "10:30:45.000");
        assert_eq!(options.format_in(&fixed_datetime(5_000)), "10:30:45.005");
        assert_eq!(options.format_in(&fixed_datetime(42_999)), "10:30:45.042");
        assert_eq!(options.format_in(&fixed_datetime(999_999)), "10:30:45.999");
    }

    #[test]
    fn test_milliseconds_truncate() {
        let options = TimestampOptions::new(false, true);
        assert_eq!(options.format_in(&fixed_datetime(1_999)), "10:30:45.001");
    }

    #[test]
    fn test_respects_time_zone() {
        let offset = FixedOffset::east_opt(2 * 3600).expect("valid offset");
        let shifted = fixed_datetime(0).with_timezone(&offset);
        let options = TimestampOptions::new(false, false);
        assert_eq!(options.format_in(&shifted), "12:30:45");
    }

    #[test]
    fn test_local_format_shape() {
        let result = format_timestamp(&Utc::now(), true, true);
        // YYYY-MM-DD HH:MM:SS.mmm
        assert_eq!(result.len(), 23);
        assert_eq!(&result[4..5], "-");
        assert_eq!(&result[10..11], " ");
        assert_eq!(&result[19..20], ".");
    }

    #[test]
    fn test_default_options() {
        let options = TimestampOptions::default();
        assert!(!options.show_date);
        assert!(options.show_milliseconds);
    }

    #[test]
    fn test_deserialization_defaults_missing_fields() {
        let options: TimestampOptions =
            serde_json::from_str(r#"{"show_date":true}"#).expect("deserialize");
        assert!(options.show_date);
        assert!(options.show_milliseconds);
    }
}
