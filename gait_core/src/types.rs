//! Limb identifiers, per-limb containers, and the records published per tick.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limb {
    Left,
    Right,
}

impl Limb {
    /// Processing order within a tick.
    pub const BOTH: [Limb; 2] = [Limb::Left, Limb::Right];

    pub const fn opposite(self) -> Limb {
        match self {
            Limb::Left => Limb::Right,
            Limb::Right => Limb::Left,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Limb::Left => "left",
            Limb::Right => "right",
        }
    }
}

impl fmt::Display for Limb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per limb, indexable by [`Limb`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerLimb<T> {
    pub left: T,
    pub right: T,
}

impl<T> PerLimb<T> {
    pub fn from_fn(mut f: impl FnMut(Limb) -> T) -> Self {
        Self {
            left: f(Limb::Left),
            right: f(Limb::Right),
        }
    }
}

impl<T> Index<Limb> for PerLimb<T> {
    type Output = T;

    fn index(&self, limb: Limb) -> &T {
        match limb {
            Limb::Left => &self.left,
            Limb::Right => &self.right,
        }
    }
}

impl<T> IndexMut<Limb> for PerLimb<T> {
    fn index_mut(&mut self, limb: Limb) -> &mut T {
        match limb {
            Limb::Left => &mut self.left,
            Limb::Right => &mut self.right,
        }
    }
}

/// A published foot-strike, genuine or synthesized by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaitEvent {
    pub limb: Limb,
    /// Capture frame at which the heel touched down.
    pub frame: i64,
    /// Wall-clock seconds of the strike.
    pub timestamp: f64,
    /// Limb cycle counter after this event.
    pub cycle: u32,
    /// Rolling mean cycle duration (s) after this event.
    pub duration: f64,
    pub synthesized: bool,
}

/// Per-limb values published each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LimbSnapshot {
    pub cycle: u32,
    pub last_strike_frame: i64,
    pub cycle_duration_avg: f64,
    pub strike_timestamp: f64,
    pub phase_fraction: f64,
}

/// Consumer view of the shared record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaitSnapshot {
    pub frame: i64,
    pub limbs: PerLimb<LimbSnapshot>,
    pub session: SessionState,
}
