mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use common::{manual_monitor, walker_frame};
use gait_core::{
    ExitReason, Feeder, InProcessChannel, Limb, MonitorHandle, ProducerHandle, Runner, RunnerCfg,
    ScriptedSource, SessionState,
};
use gait_traits::SystemClock;

fn fast_cfg() -> RunnerCfg {
    RunnerCfg {
        poll_interval_us: 100,
        idle_log_every: 10,
    }
}

#[test]
fn not_started_idles_until_shutdown() {
    let ch = InProcessChannel::shared();
    let (monitor, _clock) = manual_monitor();
    let shutdown = Arc::new(AtomicBool::new(false));
    let mut runner =
        Runner::new(monitor, MonitorHandle::new(ch.clone()), fast_cfg()).with_shutdown(shutdown.clone());

    // A frame written before the session starts is not consumed.
    ProducerHandle::new(ch).write_frame(&walker_frame(1));

    let worker = std::thread::spawn(move || runner.run());
    std::thread::sleep(Duration::from_millis(30));
    shutdown.store(true, Ordering::Relaxed);
    let summary = worker.join().unwrap().unwrap();
    assert_eq!(summary.exit, ExitReason::Shutdown);
    assert_eq!(summary.frames, 0);
}

#[test]
fn each_new_frame_is_processed_exactly_once() {
    let ch = InProcessChannel::shared();
    let producer = ProducerHandle::new(ch.clone());
    let (monitor, clock) = manual_monitor();
    let mut runner = Runner::new(monitor, MonitorHandle::new(ch), fast_cfg());
    producer.set_session(SessionState::Running);

    assert!(!runner.poll_once(), "frame 0 means nothing produced yet");
    clock.advance(Duration::from_millis(10));
    producer.write_frame(&walker_frame(1));
    assert!(runner.poll_once());
    assert!(!runner.poll_once());
    clock.advance(Duration::from_millis(10));
    producer.write_frame(&walker_frame(2));
    assert!(runner.poll_once());
    assert_eq!(runner.summary().frames, 2);
    assert_eq!(runner.monitor().last_frame(), Some(2));

    // A rewound producer is counted as stale, not reprocessed.
    producer.write_frame(&walker_frame(1));
    assert!(runner.poll_once());
    assert_eq!(runner.summary().stale, 1);
    assert_eq!(runner.summary().frames, 2);
}

#[test]
fn ended_session_exits_with_summary_and_forwards_events() {
    let ch = InProcessChannel::shared();
    let producer = ProducerHandle::new(ch.clone());
    let consumer = gait_core::ConsumerHandle::new(ch.clone());
    let (monitor, clock) = manual_monitor();
    let mut runner = Runner::new(monitor, MonitorHandle::new(ch), fast_cfg());
    let events = runner.subscribe();
    let dropped = runner.subscribe();
    drop(dropped);

    producer.set_session(SessionState::Running);
    for f in 1..=600 {
        clock.advance(Duration::from_millis(10));
        producer.write_frame(&walker_frame(f));
        assert!(runner.poll_once());
    }
    producer.set_session(SessionState::Ended);

    let summary = runner.run().unwrap();
    assert_eq!(summary.exit, ExitReason::SessionEnded);
    assert_eq!(summary.frames, 600);
    assert_eq!(summary.last_frame, Some(600));
    assert_eq!(summary.strikes[Limb::Left], 7);
    assert_eq!(summary.strikes[Limb::Right], 6);
    assert_eq!(summary.synthesized.left + summary.synthesized.right, 0);

    let received: Vec<_> = events.try_iter().collect();
    assert_eq!(received.len() as u64, summary.total_events());
    assert_eq!(received[0].frame, 7);

    let snap = consumer.snapshot().unwrap();
    assert_eq!(snap.frame, 600);
    assert_eq!(snap.session, SessionState::Ended);
    assert_eq!(snap.limbs[Limb::Left].cycle, 8);
    assert_eq!(snap.limbs[Limb::Left].last_strike_frame, 553);
    assert!(snap.limbs[Limb::Right].phase_fraction.is_finite());
}

#[test]
fn threaded_replay_reaches_last_frame() {
    let ch = InProcessChannel::shared();
    let monitor = gait_core::GaitMonitor::builder()
        .with_clock(Arc::new(SystemClock::new()))
        .build()
        .unwrap();
    let mut runner = Runner::new(monitor, MonitorHandle::new(ch.clone()), fast_cfg());
    let source = ScriptedSource::new((1..=200).map(walker_frame));

    let feeder = Feeder::spawn(source, ProducerHandle::new(ch), 1000.0, SystemClock::new());
    let summary = runner.run().unwrap();
    let written = feeder.finish().unwrap();

    assert_eq!(written, 200);
    assert_eq!(summary.exit, ExitReason::SessionEnded);
    assert_eq!(summary.last_frame, Some(200));
    assert!(summary.frames > 0 && summary.frames <= 200);
}
