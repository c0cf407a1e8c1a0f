//! Cooperative poll loop driving a `GaitMonitor` from a shared channel.
//!
//! The loop polls the producer's frame counter, ticks the monitor once per new
//! frame, publishes the result, and forwards events to subscribers. It exits
//! when the producer marks the session ended (after a final drain) or when
//! the optional shutdown flag is raised.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel as xch;

use crate::channel::MonitorHandle;
use crate::config::RunnerCfg;
use crate::error::Result;
use crate::monitor::GaitMonitor;
use crate::session::SessionState;
use crate::status::{TickOutcome, TickReport};
use crate::types::{GaitEvent, PerLimb};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    SessionEnded,
    Shutdown,
}

/// Counters accumulated over a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub stale: u64,
    /// Genuine strikes per limb.
    pub strikes: PerLimb<u64>,
    /// Synthesized corrections per limb.
    pub synthesized: PerLimb<u64>,
    pub last_frame: Option<i64>,
    pub exit: ExitReason,
}

impl Default for RunSummary {
    fn default() -> Self {
        Self {
            frames: 0,
            stale: 0,
            strikes: PerLimb::default(),
            synthesized: PerLimb::default(),
            last_frame: None,
            exit: ExitReason::SessionEnded,
        }
    }
}

impl RunSummary {
    pub fn record(&mut self, report: &TickReport) {
        self.frames += 1;
        self.last_frame = Some(report.frame);
        for ev in &report.events {
            if ev.synthesized {
                self.synthesized[ev.limb] += 1;
            } else {
                self.strikes[ev.limb] += 1;
            }
        }
    }

    pub fn total_events(&self) -> u64 {
        self.strikes.left + self.strikes.right + self.synthesized.left + self.synthesized.right
    }
}

pub struct Runner {
    monitor: GaitMonitor,
    handle: MonitorHandle,
    cfg: RunnerCfg,
    shutdown: Option<Arc<AtomicBool>>,
    subscribers: Vec<xch::Sender<GaitEvent>>,
    last_seen: i64,
    summary: RunSummary,
}

impl Runner {
    pub fn new(monitor: GaitMonitor, handle: MonitorHandle, cfg: RunnerCfg) -> Self {
        Self {
            monitor,
            handle,
            cfg,
            shutdown: None,
            subscribers: Vec::new(),
            last_seen: 0,
            summary: RunSummary::default(),
        }
    }

    /// Exit at the next poll once `flag` is set.
    pub fn with_shutdown(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = Some(flag);
        self
    }

    /// Receive every published event. Dropped receivers are pruned on the next send.
    pub fn subscribe(&mut self) -> xch::Receiver<GaitEvent> {
        let (tx, rx) = xch::unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn monitor(&self) -> &GaitMonitor {
        &self.monitor
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .is_some_and(|f| f.load(Ordering::Relaxed))
    }

    /// Process the producer's latest frame if it is new. Returns whether a
    /// frame was consumed (processed or stale).
    pub fn poll_once(&mut self) -> bool {
        let current = self.handle.input_frame();
        if current == 0 || current == self.last_seen {
            return false;
        }
        let input = self.handle.read_input();
        self.last_seen = input.frame;
        match self.monitor.tick(&input) {
            TickOutcome::Stale { .. } => {
                self.summary.stale += 1;
            }
            TickOutcome::Processed(report) => {
                self.handle.publish(&report);
                self.summary.record(&report);
                self.forward(&report.events);
            }
        }
        true
    }

    fn forward(&mut self, events: &[GaitEvent]) {
        if events.is_empty() || self.subscribers.is_empty() {
            return;
        }
        self.subscribers.retain(|tx| {
            let ok = events.iter().all(|ev| tx.send(*ev).is_ok());
            if !ok {
                tracing::debug!("event subscriber disconnected");
            }
            ok
        });
    }

    /// Run until the session ends or shutdown is requested.
    pub fn run(&mut self) -> Result<RunSummary> {
        let poll = Duration::from_micros(self.cfg.poll_interval_us.max(1));
        let mut observed = None;
        let mut idle: u64 = 0;

        loop {
            if self.shutdown_requested() {
                tracing::info!(frames = self.summary.frames, "shutdown requested");
                self.summary.exit = ExitReason::Shutdown;
                return Ok(self.summary);
            }

            let state = self.handle.session()?;
            if observed != Some(state) {
                tracing::info!(session = state.as_str(), "session state");
                observed = Some(state);
            }

            match state {
                SessionState::NotStarted => {
                    idle += 1;
                    self.log_idle(idle, state);
                    std::thread::sleep(poll);
                }
                SessionState::Running => {
                    if self.poll_once() {
                        idle = 0;
                    } else {
                        idle += 1;
                        self.log_idle(idle, state);
                        std::thread::sleep(poll);
                    }
                }
                SessionState::Ended => {
                    // The producer may have written its last frame right before ending.
                    self.poll_once();
                    tracing::info!(
                        frames = self.summary.frames,
                        events = self.summary.total_events(),
                        "session ended"
                    );
                    self.summary.exit = ExitReason::SessionEnded;
                    return Ok(self.summary);
                }
            }
        }
    }

    fn log_idle(&self, idle: u64, state: SessionState) {
        let every = self.cfg.idle_log_every;
        if every > 0 && idle % every == 0 {
            tracing::debug!(idle_polls = idle, session = state.as_str(), "waiting for frames");
        }
    }
}
