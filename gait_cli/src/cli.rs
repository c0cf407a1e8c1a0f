//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Default config location, used only when present and `--config` is absent.
pub const DEFAULT_CONFIG: &str = "etc/gait_config.toml";

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "gait", version, about = "Real-time foot-strike detection")]
pub struct Cli {
    /// Path to config TOML (typed); defaults to etc/gait_config.toml when it exists
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print events and logs as JSON lines instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a recorded trial CSV through the detector
    Replay {
        /// Trial CSV (strict header: frame,left_vertical,left_sagittal,right_vertical,right_sagittal)
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Pace frames on the wall clock through a producer thread and the shared channel
        #[arg(
            long,
            action = ArgAction::SetTrue,
            long_help = "Replay at the configured sample rate using the wall clock.\n\nA producer thread writes one frame per period into the shared channel and the poll loop consumes it, as a live capture would. Without this flag time is simulated at 1/sample_rate_hz per frame and output is deterministic."
        )]
        realtime: bool,
        /// Print per-limb counters when the replay ends
        #[arg(long, action = ArgAction::SetTrue)]
        summary: bool,
    },
    /// Load and validate the config, then print the effective settings
    CheckConfig,
}
