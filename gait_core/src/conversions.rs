//! `From` implementations bridging `gait_config` types to `gait_core` types.

use gait_traits::{MarkerFrame, MarkerSample};

use crate::config::{CoordinatorCfg, DetectorCfg, FilterCfg, MonitorCfg, RunnerCfg};

// ── FilterCfg ────────────────────────────────────────────────────────────────

impl From<&gait_config::FilterCfg> for FilterCfg {
    fn from(c: &gait_config::FilterCfg) -> Self {
        Self {
            cutoff_hz: c.cutoff_hz,
            sample_rate_hz: c.sample_rate_hz,
        }
    }
}

// ── DetectorCfg ──────────────────────────────────────────────────────────────

impl From<&gait_config::DetectorCfg> for DetectorCfg {
    fn from(c: &gait_config::DetectorCfg) -> Self {
        Self {
            strike_max_vertical: c.strike_max_vertical,
            rearm_min_rise: c.rearm_min_rise,
            velocity_lookback: c.velocity_lookback,
            duration_window: c.duration_window,
            initial_min_vertical: c.initial_min_vertical,
        }
    }
}

// ── CoordinatorCfg ───────────────────────────────────────────────────────────

impl From<&gait_config::CoordinatorCfg> for CoordinatorCfg {
    fn from(c: &gait_config::CoordinatorCfg) -> Self {
        Self {
            overdue_phase: c.overdue_phase,
            initial_cycle_duration_s: c.initial_cycle_duration_s,
        }
    }
}

// ── RunnerCfg ────────────────────────────────────────────────────────────────

impl From<&gait_config::RunnerCfg> for RunnerCfg {
    fn from(c: &gait_config::RunnerCfg) -> Self {
        Self {
            poll_interval_us: c.poll_interval_us,
            idle_log_every: c.idle_log_every,
        }
    }
}

// ── MonitorCfg ───────────────────────────────────────────────────────────────

impl From<&gait_config::Config> for MonitorCfg {
    fn from(c: &gait_config::Config) -> Self {
        Self {
            filter: (&c.filter).into(),
            detector: (&c.detector).into(),
            coordinator: (&c.coordinator).into(),
        }
    }
}

// ── Trial rows ───────────────────────────────────────────────────────────────

// Both types are foreign to this crate, so this is a function, not a `From`.
pub fn frame_from_row(r: &gait_config::TrialRow) -> MarkerFrame {
    MarkerFrame {
        frame: r.frame,
        left: MarkerSample::new(r.left_vertical, r.left_sagittal),
        right: MarkerSample::new(r.right_vertical, r.right_sagittal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_matches_core_defaults() {
        let toml = gait_config::Config::default();
        assert_eq!(MonitorCfg::from(&toml), MonitorCfg::default());
        assert_eq!(RunnerCfg::from(&toml.runner), RunnerCfg::default());
    }

    #[test]
    fn trial_row_maps_axes() {
        let row = gait_config::TrialRow {
            frame: 3,
            left_vertical: 1.0,
            left_sagittal: 2.0,
            right_vertical: 3.0,
            right_sagittal: 4.0,
        };
        let f = frame_from_row(&row);
        assert_eq!(f.frame, 3);
        assert_eq!(f.left, MarkerSample::new(1.0, 2.0));
        assert_eq!(f.right, MarkerSample::new(3.0, 4.0));
    }
}
