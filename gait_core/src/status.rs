//! Outcome of a single monitor tick.

use crate::types::{GaitEvent, LimbSnapshot, PerLimb};

/// Everything a processed tick produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub frame: i64,
    /// Clock reading used for the tick.
    pub timestamp: f64,
    /// Published events in order; synthesized corrections precede the genuine
    /// event that exposed them.
    pub events: Vec<GaitEvent>,
    pub limbs: PerLimb<LimbSnapshot>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Frame was not newer than the last processed one; nothing changed.
    Stale { frame: i64 },
    Processed(TickReport),
}
