//! Builder for `GaitMonitor`.
//!
//! Every section is optional and falls back to its default; the whole
//! parameter set is validated once in `build()`.

use std::sync::Arc;

use gait_traits::{Clock, SystemClock};

use crate::config::{CoordinatorCfg, DetectorCfg, FilterCfg, MonitorCfg};
use crate::error::Result;
use crate::monitor::GaitMonitor;

#[derive(Default)]
pub struct MonitorBuilder {
    filter: Option<FilterCfg>,
    detector: Option<DetectorCfg>,
    coordinator: Option<CoordinatorCfg>,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
}

impl GaitMonitor {
    /// Start building a monitor.
    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::default()
    }
}

impl MonitorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: FilterCfg) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_detector(mut self, detector: DetectorCfg) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn with_coordinator(mut self, coordinator: CoordinatorCfg) -> Self {
        self.coordinator = Some(coordinator);
        self
    }

    /// Inject a clock (defaults to `SystemClock`).
    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Take all three sections from a loaded TOML config.
    pub fn with_config(self, cfg: &gait_config::Config) -> Self {
        let monitor = MonitorCfg::from(cfg);
        self.with_filter(monitor.filter)
            .with_detector(monitor.detector)
            .with_coordinator(monitor.coordinator)
    }

    /// Validate and build.
    ///
    /// Errors carry a typed `BuildError` reachable via `downcast_ref`.
    pub fn build(self) -> Result<GaitMonitor> {
        let cfg = MonitorCfg {
            filter: self.filter.unwrap_or_default(),
            detector: self.detector.unwrap_or_default(),
            coordinator: self.coordinator.unwrap_or_default(),
        };
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock::new()));
        GaitMonitor::new(cfg, clock)
    }
}
