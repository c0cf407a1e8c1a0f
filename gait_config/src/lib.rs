#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and trial parsing for the gait monitor.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Trial CSV loader enforces headers and a strictly increasing frame column
//!   so a replay never feeds the monitor a stale or duplicate frame.
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Trial CSV schema.
///
/// Expected headers:
/// frame,left_vertical,left_sagittal,right_vertical,right_sagittal
///
/// Example:
/// frame,left_vertical,left_sagittal,right_vertical,right_sagittal
/// 1,81.9513,39.9065,80.1201,41.0032
/// 2,289.3255,140.2264,287.5521,139.8801
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct TrialRow {
    pub frame: i64,
    pub left_vertical: f64,
    pub left_sagittal: f64,
    pub right_vertical: f64,
    pub right_sagittal: f64,
}

pub const TRIAL_HEADERS: [&str; 5] = [
    "frame",
    "left_vertical",
    "left_sagittal",
    "right_vertical",
    "right_sagittal",
];

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct FilterCfg {
    /// Low-pass corner frequency applied to every marker axis.
    pub cutoff_hz: f64,
    /// Capture rate of the marker stream.
    pub sample_rate_hz: f64,
}

impl Default for FilterCfg {
    fn default() -> Self {
        Self {
            cutoff_hz: 20.0,
            sample_rate_hz: 100.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DetectorCfg {
    /// A strike only fires while the filtered vertical position is below this.
    pub strike_max_vertical: f64,
    /// Minimum rise above the last strike minimum before the detector re-arms.
    pub rearm_min_rise: f64,
    /// Number of preceding vertical velocities inspected by strike/re-arm.
    pub velocity_lookback: usize,
    /// Number of cycle durations averaged into `duration_avg`.
    pub duration_window: usize,
    /// Floor used as the strike minimum before the first strike.
    pub initial_min_vertical: f64,
}

impl Default for DetectorCfg {
    fn default() -> Self {
        Self {
            strike_max_vertical: 500.0,
            rearm_min_rise: 100.0,
            velocity_lookback: 3,
            duration_window: 5,
            initial_min_vertical: -1000.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CoordinatorCfg {
    /// Phase fraction past which a limb is considered overdue.
    pub overdue_phase: f64,
    /// Cycle duration published before a limb's first strike (seconds).
    pub initial_cycle_duration_s: f64,
}

impl Default for CoordinatorCfg {
    fn default() -> Self {
        Self {
            overdue_phase: 1.0,
            initial_cycle_duration_s: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct RunnerCfg {
    /// Sleep between polls of the frame counter (microseconds)
    pub poll_interval_us: u64,
    /// Emit a debug line every N idle polls (0 disables)
    pub idle_log_every: u64,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self {
            poll_interval_us: 500,
            idle_log_every: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub filter: FilterCfg,
    pub detector: DetectorCfg,
    pub coordinator: CoordinatorCfg,
    pub runner: RunnerCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

fn require_finite(name: &str, v: f64) -> eyre::Result<()> {
    if !v.is_finite() {
        eyre::bail!("{name} must be finite");
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Filter
        require_finite("filter.cutoff_hz", self.filter.cutoff_hz)?;
        require_finite("filter.sample_rate_hz", self.filter.sample_rate_hz)?;
        if self.filter.cutoff_hz <= 0.0 {
            eyre::bail!("filter.cutoff_hz must be > 0");
        }
        if self.filter.sample_rate_hz <= 0.0 {
            eyre::bail!("filter.sample_rate_hz must be > 0");
        }
        if self.filter.sample_rate_hz <= 2.0 * self.filter.cutoff_hz {
            eyre::bail!(
                "filter.sample_rate_hz ({}) must exceed twice filter.cutoff_hz ({}) (Nyquist)",
                self.filter.sample_rate_hz,
                self.filter.cutoff_hz
            );
        }

        // Detector
        require_finite(
            "detector.strike_max_vertical",
            self.detector.strike_max_vertical,
        )?;
        require_finite("detector.rearm_min_rise", self.detector.rearm_min_rise)?;
        require_finite(
            "detector.initial_min_vertical",
            self.detector.initial_min_vertical,
        )?;
        if self.detector.rearm_min_rise < 0.0 {
            eyre::bail!("detector.rearm_min_rise must be >= 0");
        }
        if !(2..=8).contains(&self.detector.velocity_lookback) {
            eyre::bail!("detector.velocity_lookback must be in [2, 8]");
        }
        if !(1..=32).contains(&self.detector.duration_window) {
            eyre::bail!("detector.duration_window must be in [1, 32]");
        }

        // Coordinator
        require_finite("coordinator.overdue_phase", self.coordinator.overdue_phase)?;
        require_finite(
            "coordinator.initial_cycle_duration_s",
            self.coordinator.initial_cycle_duration_s,
        )?;
        if self.coordinator.overdue_phase <= 0.0 {
            eyre::bail!("coordinator.overdue_phase must be > 0");
        }
        if self.coordinator.initial_cycle_duration_s <= 0.0 {
            eyre::bail!("coordinator.initial_cycle_duration_s must be > 0");
        }

        // Runner
        if self.runner.poll_interval_us == 0 {
            eyre::bail!("runner.poll_interval_us must be >= 1");
        }
        if self.runner.poll_interval_us > 1_000_000 {
            eyre::bail!("runner.poll_interval_us is unreasonably large (>1s)");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref() {
            match rot.to_ascii_lowercase().as_str() {
                "never" | "daily" | "hourly" => {}
                other => eyre::bail!(
                    "logging.rotation must be one of never|daily|hourly, got '{other}'"
                ),
            }
        }

        Ok(())
    }
}

/// Parse a trial from any reader (file, stdin, in-memory buffer).
pub fn parse_trial_csv<R: Read>(reader: R) -> eyre::Result<Vec<TrialRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers: {e}"))?
        .clone();
    let actual: Vec<String> = headers.iter().map(ToString::to_string).collect();
    if actual != TRIAL_HEADERS {
        eyre::bail!(
            "trial CSV must have headers '{}', got: {}",
            TRIAL_HEADERS.join(","),
            actual.join(",")
        );
    }

    let mut rows: Vec<TrialRow> = Vec::new();
    for (idx, rec) in rdr.deserialize::<TrialRow>().enumerate() {
        let line = idx + 2;
        let row = rec.map_err(|e| eyre::eyre!("invalid CSV row {line}: {e}"))?;
        if row.frame < 1 {
            eyre::bail!("row {line}: frame must be >= 1, got {}", row.frame);
        }
        let values = [
            row.left_vertical,
            row.left_sagittal,
            row.right_vertical,
            row.right_sagittal,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            eyre::bail!("row {line}: marker coordinates must be finite");
        }
        if let Some(prev) = rows.last()
            && row.frame <= prev.frame
        {
            eyre::bail!(
                "row {line}: frame numbers must be strictly increasing ({} after {})",
                row.frame,
                prev.frame
            );
        }
        rows.push(row);
    }

    if rows.is_empty() {
        eyre::bail!("trial CSV contains no frames");
    }
    Ok(rows)
}

pub fn load_trial_csv(path: &Path) -> eyre::Result<Vec<TrialRow>> {
    let file = std::fs::File::open(path)
        .map_err(|e| eyre::eyre!("open trial CSV {:?}: {}", path, e))?;
    parse_trial_csv(file).map_err(|e| eyre::eyre!("trial CSV {:?}: {}", path, e))
}
