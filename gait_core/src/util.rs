//! Common time/period helpers for gait_core.

/// Number of microseconds in one second.
pub const MICROS_PER_SEC: u64 = 1_000_000;

/// Compute the sampling period for a rate in Hz.
/// - Non-finite or non-positive rates fall back to one second.
/// - Ensures result is at least 1 microsecond.
#[inline]
pub fn period_from_hz(hz: f64) -> std::time::Duration {
    if !(hz.is_finite() && hz > 0.0) {
        return std::time::Duration::from_secs(1);
    }
    let us = (MICROS_PER_SEC as f64 / hz).round().max(1.0);
    std::time::Duration::from_micros(us as u64)
}
