#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Real-time foot-strike detection (hardware-agnostic).
//!
//! Marker positions arrive through `gait_traits::MarkerSource` or a shared
//! [`channel`]; time comes from `gait_traits::Clock`.
//!
//! ## Architecture
//!
//! - **Filtering**: 2nd-order Butterworth low-pass per marker axis (`filter` module)
//! - **Detection**: per-limb F-VESPA state machine (`detector` module)
//! - **Fail-safe**: Left/Right alternation and missed-strike synthesis (`coordinator` module)
//! - **Tick pipeline**: `GaitMonitor` wires the above for both limbs (`monitor` module)
//! - **Shared state**: typed single-writer handles over atomic words (`channel` module)
//! - **Orchestration**: poll loop (`runner`) and replay producer thread (`feeder`)
//!
//! ## Tick order
//!
//! Left detector, then the coordinator on its event, then the right detector
//! and the coordinator on its event. A correction synthesized for the right
//! limb is therefore applied before the right detector steps. Per-limb phase
//! fractions are computed last and overdue limbs are snapshotted for a
//! possible later correction.

pub mod builder;
pub mod channel;
pub mod config;
pub mod conversions;
pub mod coordinator;
pub mod detector;
pub mod error;
pub mod feeder;
pub mod filter;
pub mod monitor;
pub mod runner;
pub mod session;
pub mod source;
pub mod status;
pub mod types;
pub mod util;
pub mod window;

pub use builder::MonitorBuilder;
pub use channel::{
    ConsumerHandle, Field, InProcessChannel, MonitorHandle, ProducerHandle, StateChannel,
};
pub use config::{CoordinatorCfg, DetectorCfg, FilterCfg, MonitorCfg, RunnerCfg};
pub use coordinator::{Backup, FailSafeCoordinator, Resolution};
pub use detector::{DetectorPhase, EventDetector};
pub use error::{BuildError, GaitError};
pub use feeder::Feeder;
pub use filter::DigitalFilter;
pub use monitor::GaitMonitor;
pub use runner::{ExitReason, RunSummary, Runner};
pub use session::SessionState;
pub use source::ScriptedSource;
pub use status::{TickOutcome, TickReport};
pub use types::{GaitEvent, GaitSnapshot, Limb, LimbSnapshot, PerLimb};
pub use window::RollingWindow;
