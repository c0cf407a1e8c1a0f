//! The per-tick pipeline: filters, detectors, coordinator and phase tracking.

use std::sync::Arc;

use gait_traits::{Clock, MarkerFrame, MarkerSample};

use crate::config::MonitorCfg;
use crate::coordinator::FailSafeCoordinator;
use crate::detector::EventDetector;
use crate::error::Result;
use crate::filter::DigitalFilter;
use crate::status::{TickOutcome, TickReport};
use crate::types::{Limb, LimbSnapshot, PerLimb};

/// One low-pass filter per axis of a limb's heel marker.
#[derive(Debug, Clone)]
struct LimbChain {
    vertical: DigitalFilter,
    sagittal: DigitalFilter,
}

impl LimbChain {
    fn new(cfg: &MonitorCfg) -> Result<Self> {
        Ok(Self {
            vertical: DigitalFilter::new(cfg.filter.cutoff_hz, cfg.filter.sample_rate_hz)?,
            sagittal: DigitalFilter::new(cfg.filter.cutoff_hz, cfg.filter.sample_rate_hz)?,
        })
    }

    fn filter(&mut self, s: MarkerSample) -> (f64, f64) {
        (self.vertical.filter(s.vertical), self.sagittal.filter(s.sagittal))
    }
}

pub struct GaitMonitor {
    cfg: MonitorCfg,
    clock: Arc<dyn Clock + Send + Sync>,
    chains: PerLimb<LimbChain>,
    detectors: PerLimb<EventDetector>,
    coordinator: FailSafeCoordinator,
    /// Time of the first processed tick.
    session_start: Option<f64>,
    last_frame: Option<i64>,
    last_limbs: PerLimb<LimbSnapshot>,
}

impl core::fmt::Debug for GaitMonitor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GaitMonitor")
            .field("cfg", &self.cfg)
            .field("last_frame", &self.last_frame)
            .field("left_cycle", &self.detectors.left.cycle())
            .field("right_cycle", &self.detectors.right.cycle())
            .field("last_emitting", &self.coordinator.last_emitting_limb())
            .finish()
    }
}

impl GaitMonitor {
    /// Validate `cfg` and build four filters, two detectors and the coordinator.
    pub fn new(cfg: MonitorCfg, clock: Arc<dyn Clock + Send + Sync>) -> Result<Self> {
        cfg.validate().map_err(eyre::Report::new)?;
        Ok(Self {
            chains: PerLimb {
                left: LimbChain::new(&cfg)?,
                right: LimbChain::new(&cfg)?,
            },
            detectors: PerLimb::from_fn(|l| EventDetector::new(l, cfg.detector)),
            coordinator: FailSafeCoordinator::new(cfg.coordinator),
            cfg,
            clock,
            session_start: None,
            last_frame: None,
            last_limbs: PerLimb::default(),
        })
    }

    /// Process one capture frame.
    ///
    /// Frames not newer than the last processed frame are ignored.
    pub fn tick(&mut self, input: &MarkerFrame) -> TickOutcome {
        if self.last_frame.is_some_and(|last| input.frame <= last) {
            tracing::trace!(frame = input.frame, "stale frame ignored");
            return TickOutcome::Stale { frame: input.frame };
        }
        let frame = input.frame;
        let now = self.clock.now_s();
        let session_start = *self.session_start.get_or_insert(now);
        self.last_frame = Some(frame);

        // A limb's event goes through the coordinator before the next limb steps.
        let mut events = Vec::with_capacity(4);
        for limb in Limb::BOTH {
            let sample = match limb {
                Limb::Left => input.left,
                Limb::Right => input.right,
            };
            let (vertical, sagittal) = self.chains[limb].filter(sample);
            if let Some(ev) = self.detectors[limb].step(frame, vertical, sagittal, now) {
                let resolution = self
                    .coordinator
                    .observe(ev, &mut self.detectors, frame, now);
                events.extend(resolution.events());
            }
        }

        let limbs = PerLimb::from_fn(|limb| self.limb_snapshot(limb, session_start, now));
        for limb in Limb::BOTH {
            self.coordinator
                .track_phase(limb, limbs[limb].phase_fraction, frame, now);
        }
        self.last_limbs = limbs;

        TickOutcome::Processed(TickReport {
            frame,
            timestamp: now,
            events,
            limbs,
        })
    }

    /// Published reference values: before a limb's first strike the strike
    /// time is the session start and the duration is the configured initial one.
    fn limb_snapshot(&self, limb: Limb, session_start: f64, now: f64) -> LimbSnapshot {
        let d = &self.detectors[limb];
        let strike_timestamp = if d.cycle() > 1 {
            d.last_event_time()
        } else {
            session_start
        };
        let cycle_duration_avg = if d.duration_avg() > 0.0 {
            d.duration_avg()
        } else {
            self.cfg.coordinator.initial_cycle_duration_s
        };
        LimbSnapshot {
            cycle: d.cycle(),
            last_strike_frame: d.last_event_frame(),
            cycle_duration_avg,
            strike_timestamp,
            phase_fraction: (now - strike_timestamp) / cycle_duration_avg,
        }
    }

    pub fn config(&self) -> &MonitorCfg {
        &self.cfg
    }

    pub fn detector(&self, limb: Limb) -> &EventDetector {
        &self.detectors[limb]
    }

    pub fn coordinator(&self) -> &FailSafeCoordinator {
        &self.coordinator
    }

    pub fn last_frame(&self) -> Option<i64> {
        self.last_frame
    }

    /// Per-limb values from the latest processed tick (defaults before the first).
    pub fn snapshot(&self) -> PerLimb<LimbSnapshot> {
        self.last_limbs
    }
}
