use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Wall-clock abstraction for strike timestamps and loop pacing.
///
/// - now_s(): seconds since the Unix epoch (fractional, microsecond resolution or better)
/// - sleep(): sleeps for the provided duration (implementations may simulate)
/// - seconds_since(): helper to compute elapsed seconds from an earlier `now_s()` value
pub trait Clock {
    fn now_s(&self) -> f64;
    fn sleep(&self, d: Duration);

    /// Seconds elapsed since `earlier_s`, saturating at 0 when the clock went backwards.
    fn seconds_since(&self, earlier_s: f64) -> f64 {
        (self.now_s() - earlier_s).max(0.0)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_s(&self) -> f64 {
        (**self).now_s()
    }

    fn sleep(&self, d: Duration) {
        (**self).sleep(d);
    }
}

/// Default clock backed by `std::time::SystemTime`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now_s(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }

    #[inline]
    fn sleep(&self, d: Duration) {
        if d.is_zero() {
            return;
        }
        thread::sleep(d);
    }
}

/// Deterministic clock whose time only moves when advanced.
///
/// now_s() = origin_s + offset
/// sleep(d) advances internal time by d without actually sleeping.
/// Clones share the same offset, so a clone handed to a worker thread
/// observes every advance made through the original.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin_s: f64,
    offset: Arc<Mutex<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Clock starting at the Unix epoch (t = 0 s).
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    pub fn starting_at(origin_s: f64) -> Self {
        Self {
            origin_s,
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, d: Duration) {
        if let Ok(mut off) = self.offset.lock() {
            *off = off.saturating_add(d);
        }
    }

    /// Set the absolute offset relative to origin.
    pub fn set_offset(&self, d: Duration) {
        if let Ok(mut off) = self.offset.lock() {
            *off = d;
        }
    }
}

impl Clock for ManualClock {
    fn now_s(&self) -> f64 {
        let off = self.offset.lock().map(|g| *g).unwrap_or(Duration::ZERO);
        self.origin_s + off.as_secs_f64()
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}
