#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use gait_core::{GaitEvent, GaitMonitor, MonitorCfg, TickOutcome};
use gait_traits::{MarkerFrame, MarkerSample, ManualClock};

/// Samples per gait cycle of the synthetic walker (1 s at 100 Hz).
pub const PERIOD: i64 = 100;
pub const LEFT_OFFSET: i64 = 50;
pub const RIGHT_OFFSET: i64 = 0;

/// Heel marker of a synthetic walker: flat stance while the heel slides
/// back, then a half-sine lift during swing while it swings forward.
pub fn heel(frame: i64, offset: i64) -> MarkerSample {
    let p = ((frame + offset).rem_euclid(PERIOD)) as f64 / PERIOD as f64;
    if p < 0.6 {
        MarkerSample::new(50.0, 200.0 - 400.0 * (p / 0.6))
    } else {
        let q = (p - 0.6) / 0.4;
        MarkerSample::new(
            50.0 + 200.0 * (std::f64::consts::PI * q).sin(),
            -200.0 + 400.0 * (q / 0.8).min(1.0),
        )
    }
}

pub fn walker_frame(frame: i64) -> MarkerFrame {
    MarkerFrame {
        frame,
        left: heel(frame, LEFT_OFFSET),
        right: heel(frame, RIGHT_OFFSET),
    }
}

/// Monitor on a manual clock; callers advance 10 ms per frame.
pub fn manual_monitor() -> (GaitMonitor, ManualClock) {
    let clock = ManualClock::new();
    let monitor = GaitMonitor::new(MonitorCfg::default(), Arc::new(clock.clone())).unwrap();
    (monitor, clock)
}

/// Drive frames `1..=n` at 100 Hz simulated time, letting `edit` tamper with
/// each frame first. Returns every published event.
pub fn run_walker(n: i64, mut edit: impl FnMut(&mut MarkerFrame)) -> Vec<GaitEvent> {
    let (mut monitor, clock) = manual_monitor();
    let mut out = Vec::new();
    for f in 1..=n {
        clock.advance(Duration::from_millis(10));
        let mut frame = walker_frame(f);
        edit(&mut frame);
        if let TickOutcome::Processed(report) = monitor.tick(&frame) {
            out.extend(report.events);
        }
    }
    out
}
