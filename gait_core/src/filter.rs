//! Causal 2nd-order Butterworth low-pass filter.
//!
//! Coefficients come from a bilinear-transform design evaluated once at
//! construction; each call to [`DigitalFilter::filter`] is O(1) and a pure
//! function of the two-sample input/output history plus the new input.

use std::f64::consts::{PI, SQRT_2};

use crate::error::{BuildError, Result};

/// Fixed coefficient set `b1..b3` (feed-forward) and `a1..a3` (feedback).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub b1: f64,
    pub b2: f64,
    pub b3: f64,
    pub a1: f64,
    pub a2: f64,
    pub a3: f64,
}

impl Coefficients {
    fn low_pass(cutoff_hz: f64, sample_hz: f64) -> Self {
        let wc_t = 2.0 * PI * cutoff_hz / sample_hz;
        let b1 = wc_t * wc_t;
        Self {
            b1,
            b2: 2.0 * b1,
            b3: b1,
            a1: 4.0 + 2.0 * SQRT_2 * wc_t + b1,
            a2: -8.0 + 2.0 * b1,
            a3: 4.0 - 2.0 * SQRT_2 * wc_t + b1,
        }
    }
}

/// Causal 2nd-order Butterworth low-pass for one signal.
#[derive(Debug, Clone)]
pub struct DigitalFilter {
    coef: Coefficients,
    // x[-1], x[-2]
    x1: f64,
    x2: f64,
    // y[-1], y[-2]
    y1: f64,
    y2: f64,
}

impl DigitalFilter {
    /// Build a filter for `cutoff_hz` at `sample_hz`.
    ///
    /// Fails with [`BuildError::InvalidConfig`] for non-finite or non-positive
    /// frequencies and [`BuildError::Nyquist`] when `sample_hz <= 2 * cutoff_hz`.
    pub fn new(cutoff_hz: f64, sample_hz: f64) -> Result<Self> {
        if !(cutoff_hz.is_finite() && cutoff_hz > 0.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "cutoff_hz must be finite and > 0",
            )));
        }
        if !(sample_hz.is_finite() && sample_hz > 0.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "sample_rate_hz must be finite and > 0",
            )));
        }
        if sample_hz <= 2.0 * cutoff_hz {
            return Err(eyre::Report::new(BuildError::Nyquist {
                cutoff_hz,
                sample_hz,
            }));
        }
        Ok(Self {
            coef: Coefficients::low_pass(cutoff_hz, sample_hz),
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        })
    }

    /// Feed one raw sample, get one filtered sample.
    #[inline]
    pub fn filter(&mut self, x: f64) -> f64 {
        let c = &self.coef;
        let y = (c.b1 * x + c.b2 * self.x1 + c.b3 * self.x2 - c.a2 * self.y1 - c.a3 * self.y2) / c.a1;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    /// Zero the history; coefficients are kept.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    pub fn coefficients(&self) -> Coefficients {
        self.coef
    }
}
