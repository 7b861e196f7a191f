pub mod ewma;
pub mod format;
pub mod reporter;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

pub use ewma::Ewma;
pub use format::NumberFormat;
pub use reporter::{MetricsReporter, ReportOptions};

pub const BYTES_TRANSFERRED: &str = "Bytes transferred";
pub const TRANSFER_RATE: &str = "Transfer rate";

const TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Monotonic event counter, safe to bump and read from different tasks.
#[derive(Debug, Default)]
pub struct Counter {
    count: AtomicU64,
}

impl Counter {
    pub fn inc(&self, n: u64) {
        self.count.fetch_add(n, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterSnapshot {
    pub count: u64,
    pub mean_rate: f64,
    pub one_minute_rate: f64,
    pub five_minute_rate: f64,
    pub fifteen_minute_rate: f64,
}

#[derive(Debug)]
struct MeterState {
    last_tick: Instant,
    m1: Ewma,
    m5: Ewma,
    m15: Ewma,
}

/// Rate meter: mean rate since creation plus 1/5/15 minute moving averages.
///
/// Marks only touch atomics; the averages are ticked lazily on read.
#[derive(Debug)]
pub struct Meter {
    count: AtomicU64,
    uncounted: AtomicU64,
    start: Instant,
    state: Mutex<MeterState>,
}

impl Meter {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(start: Instant) -> Self {
        Self {
            count: AtomicU64::new(0),
            uncounted: AtomicU64::new(0),
            start,
            state: Mutex::new(MeterState {
                last_tick: start,
                m1: Ewma::over_minutes(1, TICK_INTERVAL),
                m5: Ewma::over_minutes(5, TICK_INTERVAL),
                m15: Ewma::over_minutes(15, TICK_INTERVAL),
            }),
        }
    }

    pub fn mark(&self, n: u64) {
        self.count.fetch_add(n, Ordering::Relaxed);
        self.uncounted.fetch_add(n, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Events per second since the meter was created.
    pub fn mean_rate(&self) -> f64 {
        self.mean_rate_at(Instant::now())
    }

    fn mean_rate_at(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.start).as_secs_f64();
        if elapsed <= 0.0 {
            return 0.0;
        }
        self.count() as f64 / elapsed
    }

    pub fn snapshot(&self) -> MeterSnapshot {
        self.snapshot_at(Instant::now())
    }

    fn snapshot_at(&self, now: Instant) -> MeterSnapshot {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let elapsed = now.saturating_duration_since(state.last_tick);
        if elapsed >= TICK_INTERVAL {
            let ticks = (elapsed.as_nanos() / TICK_INTERVAL.as_nanos()) as u32;
            state.last_tick += TICK_INTERVAL * ticks;

            let mut pending = self.uncounted.swap(0, Ordering::Relaxed);
            for _ in 0..ticks {
                state.m1.tick(pending);
                state.m5.tick(pending);
                state.m15.tick(pending);
                pending = 0;
            }
        }

        MeterSnapshot {
            count: self.count(),
            mean_rate: self.mean_rate_at(now),
            one_minute_rate: state.m1.rate(),
            five_minute_rate: state.m5.rate(),
            fifteen_minute_rate: state.m15.rate(),
        }
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters for one transfer session.
#[derive(Debug, Default)]
pub struct SessionMetrics {
    bytes_transferred: Counter,
    transfer_rate: Meter,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `n` bytes and mark the rate meter with whole kilobytes.
    pub fn record_bytes(&self, n: usize) {
        let n = n as u64;
        self.bytes_transferred.inc(n);
        self.transfer_rate.mark(n / 1024);
    }

    pub fn bytes_transferred(&self) -> u64 {
        self.bytes_transferred.count()
    }

    pub fn transfer_rate(&self) -> &Meter {
        &self.transfer_rate
    }
}
