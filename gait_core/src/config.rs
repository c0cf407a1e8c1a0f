//! Configuration types for the gait monitor.
//!
//! These are the runtime configuration structs used by `GaitMonitor` and `Runner`.
//! They are separate from the TOML-deserialized config in `gait_config`.

use crate::error::BuildError;

/// Low-pass filter configuration shared by all four marker axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCfg {
    /// Corner frequency in Hz.
    pub cutoff_hz: f64,
    /// Marker capture rate in Hz. Must exceed `2 * cutoff_hz`.
    pub sample_rate_hz: f64,
}

impl Default for FilterCfg {
    fn default() -> Self {
        Self {
            cutoff_hz: 20.0,
            sample_rate_hz: 100.0,
        }
    }
}

/// Strike/re-arm thresholds for one limb's detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorCfg {
    /// Strike only fires while the filtered vertical position is below this.
    pub strike_max_vertical: f64,
    /// Re-arm requires the vertical position two samples back to exceed the
    /// last strike minimum by more than this.
    pub rearm_min_rise: f64,
    /// Preceding vertical velocities inspected by both transitions (2..=8).
    pub velocity_lookback: usize,
    /// Cycle durations averaged into `duration_avg` (1..=32).
    pub duration_window: usize,
    /// Strike minimum assumed before the first strike.
    pub initial_min_vertical: f64,
}

impl Default for DetectorCfg {
    fn default() -> Self {
        Self {
            strike_max_vertical: 500.0,
            rearm_min_rise: 100.0,
            velocity_lookback: 3,
            duration_window: 5,
            initial_min_vertical: -1000.0,
        }
    }
}

pub const LOOKBACK_RANGE: std::ops::RangeInclusive<usize> = 2..=8;
pub const WINDOW_RANGE: std::ops::RangeInclusive<usize> = 1..=32;

/// Alternation supervisor settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatorCfg {
    /// Phase fraction beyond which a limb is overdue and backups are recorded.
    pub overdue_phase: f64,
    /// Published cycle duration before a limb has recorded any duration.
    pub initial_cycle_duration_s: f64,
}

impl Default for CoordinatorCfg {
    fn default() -> Self {
        Self {
            overdue_phase: 1.0,
            initial_cycle_duration_s: 1.0,
        }
    }
}

/// Poll loop pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerCfg {
    /// Sleep between frame-counter polls (microseconds).
    pub poll_interval_us: u64,
    /// Emit a debug line every N consecutive idle polls (0 disables).
    pub idle_log_every: u64,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self {
            poll_interval_us: 500,
            idle_log_every: 1000,
        }
    }
}

/// Everything a `GaitMonitor` needs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonitorCfg {
    pub filter: FilterCfg,
    pub detector: DetectorCfg,
    pub coordinator: CoordinatorCfg,
}

impl MonitorCfg {
    /// Reject parameter sets the monitor cannot run with.
    pub fn validate(&self) -> Result<(), BuildError> {
        let f = &self.filter;
        if !(f.cutoff_hz.is_finite() && f.cutoff_hz > 0.0) {
            return Err(BuildError::InvalidConfig("cutoff_hz must be finite and > 0"));
        }
        if !(f.sample_rate_hz.is_finite() && f.sample_rate_hz > 0.0) {
            return Err(BuildError::InvalidConfig(
                "sample_rate_hz must be finite and > 0",
            ));
        }
        if f.sample_rate_hz <= 2.0 * f.cutoff_hz {
            return Err(BuildError::Nyquist {
                cutoff_hz: f.cutoff_hz,
                sample_hz: f.sample_rate_hz,
            });
        }

        let d = &self.detector;
        if !d.strike_max_vertical.is_finite() {
            return Err(BuildError::InvalidConfig("strike_max_vertical must be finite"));
        }
        if !(d.rearm_min_rise.is_finite() && d.rearm_min_rise >= 0.0) {
            return Err(BuildError::InvalidConfig(
                "rearm_min_rise must be finite and >= 0",
            ));
        }
        if !d.initial_min_vertical.is_finite() {
            return Err(BuildError::InvalidConfig(
                "initial_min_vertical must be finite",
            ));
        }
        if !LOOKBACK_RANGE.contains(&d.velocity_lookback) {
            return Err(BuildError::InvalidConfig(
                "velocity_lookback must be in [2, 8]",
            ));
        }
        if !WINDOW_RANGE.contains(&d.duration_window) {
            return Err(BuildError::InvalidConfig(
                "duration_window must be in [1, 32]",
            ));
        }

        let c = &self.coordinator;
        if !(c.overdue_phase.is_finite() && c.overdue_phase > 0.0) {
            return Err(BuildError::InvalidConfig("overdue_phase must be finite and > 0"));
        }
        if !(c.initial_cycle_duration_s.is_finite() && c.initial_cycle_duration_s > 0.0) {
            return Err(BuildError::InvalidConfig(
                "initial_cycle_duration_s must be finite and > 0",
            ));
        }
        Ok(())
    }
}
