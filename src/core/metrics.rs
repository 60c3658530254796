//! Logger metrics for observability
//!
//! Counters for submitted, delivered and rejected messages and for sink
//! write failures. These are statistics only; draining tracks in-flight
//! messages separately, so [`LoggerMetrics::reset`] is safe at any time.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use message_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_submitted();
/// assert_eq!(metrics.pending(), 1);
///
/// metrics.record_delivered();
/// assert_eq!(metrics.pending(), 0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Messages accepted by the intake
    submitted: AtomicU64,

    /// Messages that went through delivery (some sinks may have failed)
    delivered: AtomicU64,

    /// Individual sink writes that failed
    sink_failures: AtomicU64,

    /// Messages refused because the logger was stopped
    rejected: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            submitted: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Acquire)
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Acquire)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    /// Messages submitted but not yet through delivery, since the last reset
    #[inline]
    pub fn pending(&self) -> u64 {
        // Read delivered first so a concurrent delivery cannot make it exceed submitted
        let delivered = self.delivered();
        self.submitted().saturating_sub(delivered)
    }

    #[inline]
    pub fn record_submitted(&self) -> u64 {
        self.submitted.fetch_add(1, Ordering::AcqRel)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::AcqRel)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.rejected.fetch_add(1, Ordering::Relaxed)
    }

    /// Undo a submission whose message never reached the delivery path
    #[inline]
    pub fn retract_submitted(&self) {
        self.submitted.fetch_sub(1, Ordering::AcqRel);
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Share of sink writes that failed, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been delivered.
    pub fn failure_rate(&self) -> f64 {
        let failures = self.sink_failures() as f64;
        let delivered = self.delivered() as f64;
        if delivered == 0.0 {
            0.0
        } else {
            (failures / delivered).min(1.0) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.submitted.store(0, Ordering::Release);
        self.delivered.store(0, Ordering::Release);
        self.sink_failures.store(0, Ordering::Relaxed);
        self.rejected.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            submitted: AtomicU64::new(self.submitted()),
            delivered: AtomicU64::new(self.delivered()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            rejected: AtomicU64::new(self.rejected()),
        }
    }
}
