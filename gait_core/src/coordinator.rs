//! Cross-limb supervisor enforcing strict Left/Right alternation.
//!
//! Genuine events pass through unchanged unless the same limb fires twice in
//! a row. In that case the opposite limb's strike was missed, and one event is
//! synthesized for it (from the last overdue snapshot when available) before
//! the genuine event is published.

use crate::config::CoordinatorCfg;
use crate::detector::EventDetector;
use crate::types::{GaitEvent, Limb, PerLimb};

/// Frame/time captured while a limb was overdue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backup {
    pub frame: i64,
    pub timestamp: f64,
}

/// Published outcome of one genuine event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Inserted correction for the opposite limb, published first.
    pub synthesized: Option<GaitEvent>,
    pub genuine: GaitEvent,
}

impl Resolution {
    /// Events in publication order.
    pub fn events(&self) -> impl Iterator<Item = GaitEvent> {
        self.synthesized.into_iter().chain(std::iter::once(self.genuine))
    }
}

#[derive(Debug, Clone)]
pub struct FailSafeCoordinator {
    cfg: CoordinatorCfg,
    last_emitting: Option<Limb>,
    backups: PerLimb<Option<Backup>>,
}

impl FailSafeCoordinator {
    pub fn new(cfg: CoordinatorCfg) -> Self {
        Self {
            cfg,
            last_emitting: None,
            backups: PerLimb::default(),
        }
    }

    pub fn config(&self) -> &CoordinatorCfg {
        &self.cfg
    }

    /// Record a backup for `limb` while its phase exceeds the overdue threshold.
    /// Returns whether the limb is overdue.
    pub fn track_phase(&mut self, limb: Limb, phase: f64, frame: i64, now: f64) -> bool {
        let overdue = phase > self.cfg.overdue_phase;
        if overdue {
            if self.backups[limb].is_none() {
                tracing::debug!(%limb, frame, phase, "limb overdue");
            }
            self.backups[limb] = Some(Backup {
                frame,
                timestamp: now,
            });
        }
        overdue
    }

    /// Resolve one genuine event against the alternation rule.
    ///
    /// `frame`/`now` are the current tick's values, used for the synthesized
    /// event when the opposite limb never became overdue.
    pub fn observe(
        &mut self,
        event: GaitEvent,
        detectors: &mut PerLimb<EventDetector>,
        frame: i64,
        now: f64,
    ) -> Resolution {
        let limb = event.limb;
        let other = limb.opposite();

        let synthesized = if self.last_emitting == Some(limb) {
            let backup = self.backups[other].take().unwrap_or(Backup {
                frame,
                timestamp: now,
            });
            let ev = detectors[other].apply_synthesized(backup.frame, backup.timestamp);
            tracing::warn!(
                limb = %other,
                frame = ev.frame,
                cycle = ev.cycle,
                duration = ev.duration,
                "missed strike; synthesized event"
            );
            Some(ev)
        } else {
            None
        };

        self.backups[limb] = None;
        self.last_emitting = Some(limb);
        tracing::info!(
            %limb,
            frame = event.frame,
            cycle = event.cycle,
            duration = event.duration,
            "foot strike"
        );
        Resolution {
            synthesized,
            genuine: event,
        }
    }

    pub fn last_emitting_limb(&self) -> Option<Limb> {
        self.last_emitting
    }

    pub fn pending_backup(&self, limb: Limb) -> Option<Backup> {
        self.backups[limb]
    }
}
