//! Per-limb foot-strike state machine (F-VESPA).
//!
//! The detector watches the filtered heel trajectory for the pattern of a
//! heel settling onto the ground: vertical velocity turning non-negative after
//! a run of non-positive velocities while the heel moves backwards and sits
//! low. After a strike it stays disabled until the heel has lifted clear of the
//! strike minimum and started to descend again (re-arm).

use crate::config::{DetectorCfg, LOOKBACK_RANGE, WINDOW_RANGE};
use crate::types::{GaitEvent, Limb};
use crate::window::RollingWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorPhase {
    /// Waiting for the re-arm pattern; strikes cannot fire.
    Disabled,
    /// Strike pattern is evaluated every step.
    Armed,
}

#[derive(Debug, Clone)]
pub struct EventDetector {
    limb: Limb,
    cfg: DetectorCfg,
    phase: DetectorPhase,
    min_vertical: f64,
    /// Previous vertical velocities; age 0 is the most recent.
    velocities: RollingWindow,
    /// Filtered vertical one and two samples back.
    vertical_prev: [f64; 2],
    sagittal_prev: f64,
    cycle: u32,
    last_event_frame: i64,
    last_event_time: f64,
    /// Start of the cycle currently being timed; seeded by the first step.
    cycle_start: Option<f64>,
    durations: RollingWindow,
    duration_avg: f64,
}

impl EventDetector {
    /// Out-of-range lookback/window values are clamped into their valid ranges.
    pub fn new(limb: Limb, cfg: DetectorCfg) -> Self {
        let lookback = cfg
            .velocity_lookback
            .clamp(*LOOKBACK_RANGE.start(), *LOOKBACK_RANGE.end());
        let window = cfg
            .duration_window
            .clamp(*WINDOW_RANGE.start(), *WINDOW_RANGE.end());
        let cfg = DetectorCfg {
            velocity_lookback: lookback,
            duration_window: window,
            ..cfg
        };
        Self {
            limb,
            cfg,
            phase: DetectorPhase::Disabled,
            min_vertical: cfg.initial_min_vertical,
            velocities: RollingWindow::filled(lookback, 0.0),
            vertical_prev: [0.0; 2],
            sagittal_prev: 0.0,
            cycle: 1,
            last_event_frame: 0,
            last_event_time: 0.0,
            cycle_start: None,
            durations: RollingWindow::with_capacity(window),
            duration_avg: 0.0,
        }
    }

    /// Consume one filtered sample pair. Returns the strike event, if one fired.
    ///
    /// The event frame is `frame - 1`: the strike is recognised one sample
    /// after the heel's lowest point.
    pub fn step(&mut self, frame: i64, vertical: f64, sagittal: f64, now: f64) -> Option<GaitEvent> {
        let cycle_start = *self.cycle_start.get_or_insert(now);
        let vel_vertical = vertical - self.vertical_prev[0];
        let vel_sagittal = sagittal - self.sagittal_prev;

        let mut event = None;
        if self.phase == DetectorPhase::Armed
            && self.strike_matches(vel_vertical, vel_sagittal, vertical)
        {
            self.min_vertical = self.vertical_prev[0];
            self.durations.push(now - cycle_start);
            self.duration_avg = self.durations.mean();
            self.cycle_start = Some(now);
            self.last_event_time = now;
            self.last_event_frame = frame.saturating_sub(1);
            self.cycle = self.cycle.saturating_add(1);
            self.phase = DetectorPhase::Disabled;
            tracing::debug!(
                limb = %self.limb,
                frame = self.last_event_frame,
                cycle = self.cycle,
                duration_avg = self.duration_avg,
                "strike detected"
            );
            event = Some(GaitEvent {
                limb: self.limb,
                frame: self.last_event_frame,
                timestamp: now,
                cycle: self.cycle,
                duration: self.duration_avg,
                synthesized: false,
            });
        } else if frame > 2 && self.rearm_matches(vel_vertical) {
            if self.phase == DetectorPhase::Disabled {
                tracing::debug!(limb = %self.limb, frame, "detector armed");
            }
            self.phase = DetectorPhase::Armed;
        }

        self.velocities.push(vel_vertical);
        self.vertical_prev = [vertical, self.vertical_prev[0]];
        self.sagittal_prev = sagittal;
        event
    }

    fn strike_matches(&self, vel_vertical: f64, vel_sagittal: f64, vertical: f64) -> bool {
        vel_vertical >= 0.0
            && self.velocities.iter().all(|v| v <= 0.0)
            && vel_sagittal <= 0.0
            && vertical < self.cfg.strike_max_vertical
    }

    fn rearm_matches(&self, vel_vertical: f64) -> bool {
        vel_vertical < 0.0
            && self.velocities.get(0).is_some_and(|v| v <= 0.0)
            && self.velocities.iter().skip(1).all(|v| v >= 0.0)
            && (self.vertical_prev[1] - self.min_vertical) > self.cfg.rearm_min_rise
    }

    /// Record a strike the coordinator inferred for this limb.
    ///
    /// Advances the cycle and moves the strike reference to the snapshot; the
    /// duration window is left as is, so the event carries the previous mean.
    pub fn apply_synthesized(&mut self, frame: i64, timestamp: f64) -> GaitEvent {
        self.cycle = self.cycle.saturating_add(1);
        self.last_event_frame = frame;
        self.last_event_time = timestamp;
        self.cycle_start = Some(timestamp);
        GaitEvent {
            limb: self.limb,
            frame,
            timestamp,
            cycle: self.cycle,
            duration: self.duration_avg,
            synthesized: true,
        }
    }

    pub fn limb(&self) -> Limb {
        self.limb
    }

    pub fn config(&self) -> &DetectorCfg {
        &self.cfg
    }

    pub fn phase(&self) -> DetectorPhase {
        self.phase
    }

    pub fn is_armed(&self) -> bool {
        self.phase == DetectorPhase::Armed
    }

    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn last_event_frame(&self) -> i64 {
        self.last_event_frame
    }

    /// Timestamp of the latest strike, 0.0 before the first one.
    pub fn last_event_time(&self) -> f64 {
        self.last_event_time
    }

    /// Mean of the recorded cycle durations, 0.0 before the first strike.
    pub fn duration_avg(&self) -> f64 {
        self.duration_avg
    }

    pub fn durations_recorded(&self) -> usize {
        self.durations.len()
    }

    pub fn min_vertical(&self) -> f64 {
        self.min_vertical
    }
}
