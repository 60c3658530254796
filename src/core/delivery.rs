//! Delivery engine
//!
//! [`Dispatcher`] formats one message and fans the line out to the sinks
//! active at that moment. A [`DeliveryStrategy`] decides when and on which
//! thread the dispatcher runs:
//!
//! - [`OrderedWorker`]: a single background thread draining an unbounded FIFO
//!   queue. Lines reach the sinks in submission order.
//! - [`DetachedDelivery`]: one short-lived thread per message. Lower latency,
//!   no ordering across messages.

use super::{
    config::ConfigStore,
    error::{LoggerError, Result},
    message::LogMessage,
    metrics::LoggerMetrics,
    severity::Severity,
    sink::Sink,
};
use crate::sinks::FileSink;
use crossbeam_channel::{unbounded, RecvTimeoutError, Sender};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// How long the ordered worker waits for a message before re-checking its stop flag
pub const IDLE_BACKOFF: Duration = Duration::from_millis(5);

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(1);
const JOIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Formats a message and writes it to every active sink
pub struct Dispatcher {
    config: Arc<ConfigStore>,
    /// Also serializes whole deliveries, so lines from concurrent
    /// deliveries never interleave within a sink.
    console: Mutex<Box<dyn Sink>>,
    metrics: Arc<LoggerMetrics>,
}

impl Dispatcher {
    pub fn new(
        config: Arc<ConfigStore>,
        console: Box<dyn Sink>,
        metrics: Arc<LoggerMetrics>,
    ) -> Self {
        Self {
            config,
            console: Mutex::new(console),
            metrics,
        }
    }

    pub fn metrics(&self) -> &Arc<LoggerMetrics> {
        &self.metrics
    }

    /// Deliver one message under a single configuration snapshot.
    ///
    /// A failing sink is reported on stderr and does not stop delivery to
    /// the remaining sinks.
    pub fn deliver(&self, message: &LogMessage) {
        let config = self.config.snapshot();
        if config.has_active_sinks() {
            let line = message.format_line(config.timestamp);
            let severity = message.severity();

            let mut console = self.console.lock();
            if config.console_enabled {
                self.write_isolated(&mut **console, severity, &line);
            }
            for path in &config.active_files {
                let mut sink = FileSink::new(path);
                self.write_isolated(&mut sink, severity, &line);
            }
        }

        self.metrics.record_delivered();
    }

    pub fn flush_console(&self) -> Result<()> {
        self.console.lock().flush()
    }

    fn write_isolated(&self, sink: &mut dyn Sink, severity: Severity, line: &str) {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            sink.write_line(severity, line)?;
            sink.flush()
        }));

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", sink.name(), e);
                self.metrics.record_sink_failure();
            }
            Err(panic_info) => {
                let err = LoggerError::sink_panicked(sink.name(), panic_info.as_ref());
                eprintln!("[LOGGER CRITICAL] {}. Other sinks continue to function.", err);
                self.metrics.record_sink_failure();
            }
        }
    }
}

/// A way of moving messages from callers to the [`Dispatcher`]
pub trait DeliveryStrategy: Send + Sync {
    /// Hand over a message. Never blocks on I/O and never fails visibly.
    fn submit(&self, message: LogMessage);

    /// Wait until every submitted message has been delivered.
    ///
    /// Returns `false` if `timeout` expired first.
    fn drain(&self, timeout: Duration) -> bool;

    /// Refuse further messages, deliver what is pending and release threads.
    ///
    /// Returns `false` if `timeout` expired before delivery finished.
    fn stop(&self, timeout: Duration) -> bool;

    fn name(&self) -> &str;
}

/// Strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Single worker, FIFO
    #[default]
    Ordered,
    /// Thread per message, unordered
    Detached,
}

impl DeliveryMode {
    pub fn start(self, dispatcher: Arc<Dispatcher>) -> Result<Box<dyn DeliveryStrategy>> {
        match self {
            DeliveryMode::Ordered => Ok(Box::new(OrderedWorker::spawn(dispatcher)?)),
            DeliveryMode::Detached => Ok(Box::new(DetachedDelivery::new(dispatcher))),
        }
    }
}

/// Messages a strategy has accepted that have not yet left the dispatcher.
///
/// Kept apart from [`LoggerMetrics`], whose counters callers may reset.
#[derive(Debug, Clone, Default)]
struct InFlight(Arc<AtomicU64>);

impl InFlight {
    fn enter(&self) {
        self.0.fetch_add(1, Ordering::AcqRel);
    }

    fn leave(&self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }

    fn count(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    fn wait_idle(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        loop {
            if self.count() == 0 {
                return true;
            }
            if start.elapsed() >= timeout {
                return false;
            }
            thread::sleep(DRAIN_POLL_INTERVAL);
        }
    }
}

/// Ordered delivery through one background thread
pub struct OrderedWorker {
    sender: RwLock<Option<Sender<LogMessage>>>,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
    running: Arc<AtomicBool>,
    in_flight: InFlight,
    metrics: Arc<LoggerMetrics>,
}

impl OrderedWorker {
    pub fn spawn(dispatcher: Arc<Dispatcher>) -> Result<Self> {
        let (sender, receiver) = unbounded::<LogMessage>();
        let running = Arc::new(AtomicBool::new(true));
        let in_flight = InFlight::default();
        let metrics = Arc::clone(dispatcher.metrics());

        let running_clone = Arc::clone(&running);
        let in_flight_clone = in_flight.clone();
        let handle = thread::Builder::new()
            .name("logger-delivery".to_string())
            .spawn(move || {
                let deliver = |message: LogMessage| {
                    dispatcher.deliver(&message);
                    in_flight_clone.leave();
                };

                loop {
                    match receiver.recv_timeout(IDLE_BACKOFF) {
                        Ok(message) => deliver(message),
                        Err(RecvTimeoutError::Timeout) => {
                            if !running_clone.load(Ordering::Acquire) {
                                break;
                            }
                        }
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }

                // Stop flag observed; flush anything that raced in behind it
                for message in receiver.try_iter() {
                    deliver(message);
                }
            })
            .map_err(|e| LoggerError::worker_spawn("ordered delivery", e))?;

        Ok(Self {
            sender: RwLock::new(Some(sender)),
            handle: Mutex::new(Some(handle)),
            running,
            in_flight,
            metrics,
        })
    }
}

impl DeliveryStrategy for OrderedWorker {
    fn submit(&self, message: LogMessage) {
        let sender = self.sender.read();
        match sender.as_ref() {
            Some(sender) => {
                self.in_flight.enter();
                self.metrics.record_submitted();
                if sender.send(message).is_err() {
                    // Worker is gone
                    self.in_flight.leave();
                    self.metrics.retract_submitted();
                }
            }
            None => {
                self.metrics.record_rejected();
            }
        }
    }

    fn drain(&self, timeout: Duration) -> bool {
        self.in_flight.wait_idle(timeout)
    }

    fn stop(&self, timeout: Duration) -> bool {
        self.running.store(false, Ordering::Release);
        // Closing the channel lets the worker finish the backlog and exit
        drop(self.sender.write().take());

        let Some(handle) = self.handle.lock().take() else {
            return true;
        };

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!("[LOGGER ERROR] Delivery thread panicked during shutdown: {:?}", e);
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Delivery thread did not finish within {:?}. \
                     {} queued messages may be lost.",
                    timeout,
                    self.in_flight.count()
                );
                return false;
            }

            thread::sleep(JOIN_POLL_INTERVAL);
        }
    }

    fn name(&self) -> &str {
        "ordered"
    }
}

/// Unordered delivery: every message gets its own short-lived thread
pub struct DetachedDelivery {
    dispatcher: Arc<Dispatcher>,
    accepting: AtomicBool,
    in_flight: InFlight,
}

impl DetachedDelivery {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            accepting: AtomicBool::new(true),
            in_flight: InFlight::default(),
        }
    }
}

impl DeliveryStrategy for DetachedDelivery {
    fn submit(&self, message: LogMessage) {
        let metrics = self.dispatcher.metrics();
        if !self.accepting.load(Ordering::Acquire) {
            metrics.record_rejected();
            return;
        }

        self.in_flight.enter();
        metrics.record_submitted();
        let dispatcher = Arc::clone(&self.dispatcher);
        let in_flight = self.in_flight.clone();
        let spawned = thread::Builder::new()
            .name("logger-detached".to_string())
            .spawn(move || {
                dispatcher.deliver(&message);
                in_flight.leave();
            });

        if let Err(e) = spawned {
            self.in_flight.leave();
            metrics.retract_submitted();
            eprintln!(
                "[LOGGER ERROR] {}",
                LoggerError::worker_spawn("detached delivery", e)
            );
        }
    }

    fn drain(&self, timeout: Duration) -> bool {
        self.in_flight.wait_idle(timeout)
    }

    fn stop(&self, timeout: Duration) -> bool {
        self.accepting.store(false, Ordering::Release);
        let drained = self.drain(timeout);
        if !drained {
            eprintln!(
                "[LOGGER WARNING] {} detached deliveries still running after {:?}. \
                 Their messages may be lost.",
                self.in_flight.count(),
                timeout
            );
        }
        drained
    }

    fn name(&self) -> &str {
        "detached"
    }
}
