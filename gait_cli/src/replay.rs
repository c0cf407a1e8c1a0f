//! Trial replay: CSV rows through the monitor, events printed to stdout.
//!
//! Simulated mode ticks the monitor directly with a manual clock advanced by one
//! sampling period per frame, so the output is fully determined by the file.
//! Realtime mode runs the live wiring: a paced feeder thread writes into the
//! shared channel and the poll loop consumes it on the wall clock.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use eyre::Result;
use gait_core::conversions::frame_from_row;
use gait_core::error::GaitError;
use gait_core::util::period_from_hz;
use gait_core::{
    ExitReason, Feeder, GaitEvent, GaitMonitor, InProcessChannel, MonitorHandle, ProducerHandle,
    RunSummary, Runner, RunnerCfg, ScriptedSource, TickOutcome,
};
use gait_traits::{ManualClock, SystemClock};
use serde_json::json;

#[derive(Debug, Clone, Copy)]
pub struct ReplayOpts {
    pub json: bool,
    pub realtime: bool,
    pub summary: bool,
}

pub fn run_replay(
    cfg: &gait_config::Config,
    input: &Path,
    opts: ReplayOpts,
    shutdown: Arc<AtomicBool>,
) -> Result<()> {
    let rows = gait_config::load_trial_csv(input)
        .map_err(|e| GaitError::Source(format!("{e:#}")))?;
    tracing::info!(
        input = %input.display(),
        frames = rows.len(),
        realtime = opts.realtime,
        "replay start"
    );

    let summary = if opts.realtime {
        replay_realtime(cfg, &rows, opts, shutdown)?
    } else {
        replay_simulated(cfg, &rows, opts, &shutdown)?
    };

    tracing::info!(
        frames = summary.frames,
        events = summary.total_events(),
        exit = ?summary.exit,
        "replay complete"
    );
    if opts.summary {
        print_summary(&summary, opts.json);
    }
    Ok(())
}

fn replay_simulated(
    cfg: &gait_config::Config,
    rows: &[gait_config::TrialRow],
    opts: ReplayOpts,
    shutdown: &AtomicBool,
) -> Result<RunSummary> {
    let clock = ManualClock::new();
    let mut monitor = GaitMonitor::builder()
        .with_config(cfg)
        .with_clock(Arc::new(clock.clone()))
        .build()?;
    let period = period_from_hz(cfg.filter.sample_rate_hz);

    let mut summary = RunSummary::default();
    for row in rows {
        if shutdown.load(Ordering::Relaxed) {
            summary.exit = ExitReason::Shutdown;
            break;
        }
        clock.advance(period);
        match monitor.tick(&frame_from_row(row)) {
            TickOutcome::Processed(report) => {
                for ev in &report.events {
                    print_event(ev, opts.json);
                }
                summary.record(&report);
            }
            // loaded rows strictly increase
            TickOutcome::Stale { .. } => summary.stale += 1,
        }
    }
    Ok(summary)
}

fn replay_realtime(
    cfg: &gait_config::Config,
    rows: &[gait_config::TrialRow],
    opts: ReplayOpts,
    shutdown: Arc<AtomicBool>,
) -> Result<RunSummary> {
    let ch = InProcessChannel::shared();
    let monitor = GaitMonitor::builder()
        .with_config(cfg)
        .with_clock(Arc::new(SystemClock::new()))
        .build()?;
    let mut runner = Runner::new(
        monitor,
        MonitorHandle::new(ch.clone()),
        RunnerCfg::from(&cfg.runner),
    )
    .with_shutdown(shutdown);
    let events = runner.subscribe();

    let json = opts.json;
    let printer = std::thread::spawn(move || {
        // Ends once the runner (the only sender) is dropped.
        for ev in events {
            print_event(&ev, json);
        }
    });

    let feeder = Feeder::spawn(
        ScriptedSource::from_rows(rows),
        ProducerHandle::new(ch),
        cfg.filter.sample_rate_hz,
        SystemClock::new(),
    );
    let summary = runner.run()?;
    drop(runner);
    if printer.join().is_err() {
        tracing::warn!("event printer thread panicked");
    }

    if summary.exit == ExitReason::Shutdown {
        feeder.stop();
    }
    let written = feeder.finish()?;
    tracing::debug!(written, "feeder finished");
    Ok(summary)
}

fn print_event(ev: &GaitEvent, json: bool) {
    if json {
        println!(
            "{}",
            json!({
                "limb": ev.limb.as_str(),
                "frame": ev.frame,
                "timestamp": ev.timestamp,
                "cycle": ev.cycle,
                "duration": ev.duration,
                "synthesized": ev.synthesized,
            })
        );
    } else {
        let tag = if ev.synthesized { " (synthesized)" } else { "" };
        println!(
            "{:<5} strike frame={} t={:.3}s cycle={} avg={:.3}s{tag}",
            ev.limb.as_str(),
            ev.frame,
            ev.timestamp,
            ev.cycle,
            ev.duration
        );
    }
}

fn print_summary(s: &RunSummary, json: bool) {
    let exit = match s.exit {
        ExitReason::SessionEnded => "ended",
        ExitReason::Shutdown => "shutdown",
    };
    if json {
        println!(
            "{}",
            json!({
                "summary": {
                    "frames": s.frames,
                    "stale": s.stale,
                    "strikes": { "left": s.strikes.left, "right": s.strikes.right },
                    "synthesized": { "left": s.synthesized.left, "right": s.synthesized.right },
                    "last_frame": s.last_frame,
                    "exit": exit,
                }
            })
        );
    } else {
        println!("--- Replay Summary ---");
        println!("Frames: {} (stale {})", s.frames, s.stale);
        println!("Strikes L/R: {} / {}", s.strikes.left, s.strikes.right);
        println!(
            "Synthesized L/R: {} / {}",
            s.synthesized.left, s.synthesized.right
        );
        match s.last_frame {
            Some(f) => println!("Last frame: {f}"),
            None => println!("Last frame: -"),
        }
        println!("Exit: {exit}");
    }
}
