#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod cli;
mod error_fmt;
mod replay;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::{Result, WrapErr};
use gait_core::error::GaitError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::cli::{Cli, Commands, DEFAULT_CONFIG, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    // Only the first install takes effect.
    let _ = color_eyre::install();

    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    match dispatch(cli) {
        Ok(()) => 0,
        Err(e) => {
            if JSON_MODE.get().copied().unwrap_or(false) {
                eprintln!("{}", format_error_json(&e));
            } else {
                eprintln!("{}", humanize(&e));
            }
            exit_code_for_error(&e)
        }
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let cfg = load_config(cli.config.as_deref())?;
    init_tracing(cli.json, &cli.log_level, &cfg.logging)?;

    match cli.cmd {
        Commands::Replay {
            input,
            realtime,
            summary,
        } => {
            let shutdown = install_ctrlc();
            let opts = replay::ReplayOpts {
                json: cli.json,
                realtime,
                summary,
            };
            replay::run_replay(&cfg, &input, opts, shutdown)
        }
        Commands::CheckConfig => print_config(&cfg, cli.json),
    }
}

/// Read, parse, and validate the TOML config.
///
/// An absent `--config` falls back to the default path when that file exists,
/// and to built-in defaults otherwise. Every failure is a `GaitError::Config`.
fn load_config(path: Option<&Path>) -> Result<gait_config::Config> {
    let path: PathBuf = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            if !default.exists() {
                return Ok(gait_config::Config::default());
            }
            default
        }
    };

    let text = std::fs::read_to_string(&path)
        .map_err(|e| GaitError::Config(format!("read {}: {e}", path.display())))?;
    let cfg = gait_config::load_toml(&text)
        .map_err(|e| GaitError::Config(format!("parse {}: {e}", path.display())))?;
    cfg.validate()
        .map_err(|e| GaitError::Config(format!("{}: {e}", path.display())))?;
    Ok(cfg)
}

fn init_tracing(json: bool, level: &str, logging: &gait_config::Logging) -> Result<()> {
    // RUST_LOG wins over --log-level for the console
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    // Logs go to stderr; stdout carries the event stream.
    if json {
        layers.push(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_filter(console_filter)
                .boxed(),
        );
    } else {
        layers.push(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(console_filter)
                .boxed(),
        );
    }

    if let Some(file) = logging.file.as_deref() {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .ok_or_else(|| GaitError::Config(format!("logging.file has no file name: {file}")))?;
        std::fs::create_dir_all(dir)
            .map_err(|e| GaitError::Io(format!("create log dir {}: {e}", dir.display())))?;

        let rotation = match logging
            .rotation
            .as_deref()
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("daily") => tracing_appender::rolling::Rotation::DAILY,
            Some("hourly") => tracing_appender::rolling::Rotation::HOURLY,
            _ => tracing_appender::rolling::Rotation::NEVER,
        };
        let appender = tracing_appender::rolling::RollingFileAppender::new(rotation, dir, name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);

        let file_level = logging.level.as_deref().unwrap_or("info");
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new(file_level))
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .wrap_err("install tracing subscriber")?;
    Ok(())
}

fn install_ctrlc() -> Arc<AtomicBool> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        flag.store(true, Ordering::Relaxed);
    }) {
        tracing::warn!(error = %e, "could not install Ctrl-C handler; replay cannot be interrupted");
    }
    shutdown
}

fn print_config(cfg: &gait_config::Config, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string(cfg).wrap_err("render config as JSON")?;
        println!("{text}");
    } else {
        let text = toml::to_string_pretty(cfg).wrap_err("render config as TOML")?;
        println!("# effective configuration (valid)");
        print!("{text}");
    }
    tracing::debug!(
        cutoff_hz = cfg.filter.cutoff_hz,
        sample_rate_hz = cfg.filter.sample_rate_hz,
        "config ok"
    );
    Ok(())
}
