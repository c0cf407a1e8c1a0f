//! Shared per-frame record between producer, monitor, and consumers.
//!
//! Every field is one 64-bit word stored atomically; each field has exactly
//! one writing side, enforced by which handle exposes the setter:
//!
//! - [`ProducerHandle`] writes marker samples, the frame counter and the session flag.
//! - [`MonitorHandle`] reads inputs and writes the published gait state.
//! - [`ConsumerHandle`] only reads.
//!
//! Readers tolerate torn reads across unrelated fields within a tick. Attaching
//! is constructing a handle from an `Arc<dyn StateChannel>`; detaching is dropping it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use gait_traits::{MarkerFrame, MarkerSample};

use crate::error::Result;
use crate::session::SessionState;
use crate::status::TickReport;
use crate::types::{GaitSnapshot, Limb, LimbSnapshot, PerLimb};

/// Word slots of the shared record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Field {
    // producer
    InputFrame,
    LeftVertical,
    LeftSagittal,
    RightVertical,
    RightSagittal,
    Session,
    // monitor
    Frame,
    LeftCycle,
    LeftLastStrikeFrame,
    LeftCycleDurationAvg,
    LeftStrikeTimestamp,
    LeftPhaseFraction,
    RightCycle,
    RightLastStrikeFrame,
    RightCycleDurationAvg,
    RightStrikeTimestamp,
    RightPhaseFraction,
}

impl Field {
    pub const COUNT: usize = 17;

    const fn index(self) -> usize {
        self as usize
    }

    fn sample(limb: Limb) -> (Field, Field) {
        match limb {
            Limb::Left => (Field::LeftVertical, Field::LeftSagittal),
            Limb::Right => (Field::RightVertical, Field::RightSagittal),
        }
    }

    /// (cycle, last_strike_frame, cycle_duration_avg, strike_timestamp, phase_fraction)
    fn published(limb: Limb) -> [Field; 5] {
        match limb {
            Limb::Left => [
                Field::LeftCycle,
                Field::LeftLastStrikeFrame,
                Field::LeftCycleDurationAvg,
                Field::LeftStrikeTimestamp,
                Field::LeftPhaseFraction,
            ],
            Limb::Right => [
                Field::RightCycle,
                Field::RightLastStrikeFrame,
                Field::RightCycleDurationAvg,
                Field::RightStrikeTimestamp,
                Field::RightPhaseFraction,
            ],
        }
    }
}

/// Word-addressed storage backing the shared record.
///
/// `store` must publish with release semantics and `load` observe with acquire
/// semantics so the frame counter orders the sample words written before it.
pub trait StateChannel: Send + Sync {
    fn load(&self, field: Field) -> u64;
    fn store(&self, field: Field, value: u64);
}

/// Lock-free in-process backend.
#[derive(Debug)]
pub struct InProcessChannel {
    words: [AtomicU64; Field::COUNT],
}

impl Default for InProcessChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl InProcessChannel {
    pub fn new() -> Self {
        Self {
            words: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    /// Convenience: a fresh channel behind an `Arc<dyn StateChannel>`.
    pub fn shared() -> Arc<dyn StateChannel> {
        Arc::new(Self::new())
    }
}

impl StateChannel for InProcessChannel {
    #[inline]
    fn load(&self, field: Field) -> u64 {
        self.words[field.index()].load(Ordering::Acquire)
    }

    #[inline]
    fn store(&self, field: Field, value: u64) {
        self.words[field.index()].store(value, Ordering::Release);
    }
}

// Word encodings
#[inline]
fn load_f64(ch: &dyn StateChannel, f: Field) -> f64 {
    f64::from_bits(ch.load(f))
}

#[inline]
fn load_i64(ch: &dyn StateChannel, f: Field) -> i64 {
    ch.load(f) as i64
}

fn load_session(ch: &dyn StateChannel) -> Result<SessionState> {
    SessionState::from_word(ch.load(Field::Session)).map_err(eyre::Report::new)
}

/// Writer side of the marker inputs and session flag.
#[derive(Clone)]
pub struct ProducerHandle {
    ch: Arc<dyn StateChannel>,
}

impl ProducerHandle {
    pub fn new(ch: Arc<dyn StateChannel>) -> Self {
        Self { ch }
    }

    /// Samples first, frame counter last.
    pub fn write_frame(&self, frame: &MarkerFrame) {
        for (limb, s) in [(Limb::Left, frame.left), (Limb::Right, frame.right)] {
            let (v, sg) = Field::sample(limb);
            self.ch.store(v, s.vertical.to_bits());
            self.ch.store(sg, s.sagittal.to_bits());
        }
        self.ch.store(Field::InputFrame, frame.frame as u64);
    }

    pub fn set_session(&self, state: SessionState) {
        self.ch.store(Field::Session, state.to_word());
    }
}

/// Monitor side: reads inputs, publishes gait state.
#[derive(Clone)]
pub struct MonitorHandle {
    ch: Arc<dyn StateChannel>,
}

impl MonitorHandle {
    pub fn new(ch: Arc<dyn StateChannel>) -> Self {
        Self { ch }
    }

    /// Latest frame counter written by the producer (0 = nothing yet).
    pub fn input_frame(&self) -> i64 {
        load_i64(self.ch.as_ref(), Field::InputFrame)
    }

    pub fn read_input(&self) -> MarkerFrame {
        let ch = self.ch.as_ref();
        let frame = load_i64(ch, Field::InputFrame);
        let read = |limb| {
            let (v, s) = Field::sample(limb);
            MarkerSample::new(load_f64(ch, v), load_f64(ch, s))
        };
        MarkerFrame {
            frame,
            left: read(Limb::Left),
            right: read(Limb::Right),
        }
    }

    pub fn session(&self) -> Result<SessionState> {
        load_session(self.ch.as_ref())
    }

    pub fn publish(&self, report: &TickReport) {
        for limb in Limb::BOTH {
            let snap = &report.limbs[limb];
            let [cycle, last, dur, ts, phase] = Field::published(limb);
            self.ch.store(cycle, u64::from(snap.cycle));
            self.ch.store(last, snap.last_strike_frame as u64);
            self.ch.store(dur, snap.cycle_duration_avg.to_bits());
            self.ch.store(ts, snap.strike_timestamp.to_bits());
            self.ch.store(phase, snap.phase_fraction.to_bits());
        }
        self.ch.store(Field::Frame, report.frame as u64);
    }
}

/// Read-only consumer view.
#[derive(Clone)]
pub struct ConsumerHandle {
    ch: Arc<dyn StateChannel>,
}

impl ConsumerHandle {
    pub fn new(ch: Arc<dyn StateChannel>) -> Self {
        Self { ch }
    }

    pub fn session(&self) -> Result<SessionState> {
        load_session(self.ch.as_ref())
    }

    pub fn snapshot(&self) -> Result<GaitSnapshot> {
        let ch = self.ch.as_ref();
        let limbs = PerLimb::from_fn(|limb| {
            let [cycle, last, dur, ts, phase] = Field::published(limb);
            LimbSnapshot {
                cycle: u32::try_from(ch.load(cycle)).unwrap_or(u32::MAX),
                last_strike_frame: load_i64(ch, last),
                cycle_duration_avg: load_f64(ch, dur),
                strike_timestamp: load_f64(ch, ts),
                phase_fraction: load_f64(ch, phase),
            }
        });
        Ok(GaitSnapshot {
            frame: load_i64(ch, Field::Frame),
            limbs,
            session: load_session(ch)?,
        })
    }
}
