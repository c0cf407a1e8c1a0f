use gait_core::{
    ConsumerHandle, InProcessChannel, Limb, LimbSnapshot, MonitorHandle, PerLimb, ProducerHandle,
    SessionState, TickReport,
};
use gait_traits::{MarkerFrame, MarkerSample};
use rstest::rstest;

#[rstest]
fn producer_frame_is_read_back_unchanged() {
    let ch = InProcessChannel::shared();
    let producer = ProducerHandle::new(ch.clone());
    let monitor = MonitorHandle::new(ch);

    let frame = MarkerFrame {
        frame: 4242,
        left: MarkerSample::new(-12.5, 1e-9),
        right: MarkerSample::new(f64::MAX, -0.0),
    };
    producer.write_frame(&frame);
    assert_eq!(monitor.input_frame(), 4242);
    let got = monitor.read_input();
    assert_eq!(got.frame, frame.frame);
    assert_eq!(got.left.vertical.to_bits(), frame.left.vertical.to_bits());
    assert_eq!(got.left.sagittal.to_bits(), frame.left.sagittal.to_bits());
    assert_eq!(got.right.vertical.to_bits(), frame.right.vertical.to_bits());
    assert_eq!(got.right.sagittal.to_bits(), frame.right.sagittal.to_bits());
}

#[rstest]
#[case(SessionState::NotStarted)]
#[case(SessionState::Running)]
#[case(SessionState::Ended)]
fn session_state_round_trips(#[case] state: SessionState) {
    let ch = InProcessChannel::shared();
    ProducerHandle::new(ch.clone()).set_session(state);
    assert_eq!(MonitorHandle::new(ch.clone()).session().unwrap(), state);
    assert_eq!(ConsumerHandle::new(ch).session().unwrap(), state);
}

#[rstest]
fn published_report_is_observed_by_consumer() {
    let ch = InProcessChannel::shared();
    let monitor = MonitorHandle::new(ch.clone());
    let consumer = ConsumerHandle::new(ch.clone());
    ProducerHandle::new(ch).set_session(SessionState::Running);

    let report = TickReport {
        frame: 303,
        timestamp: 3.03,
        events: Vec::new(),
        limbs: PerLimb {
            left: LimbSnapshot {
                cycle: 5,
                last_strike_frame: 253,
                cycle_duration_avg: 0.6325,
                strike_timestamp: 2.54,
                phase_fraction: 0.7826,
            },
            right: LimbSnapshot {
                cycle: 4,
                last_strike_frame: 203,
                cycle_duration_avg: 0.6767,
                strike_timestamp: 2.04,
                phase_fraction: 1.4778,
            },
        },
    };
    monitor.publish(&report);

    let snap = consumer.snapshot().unwrap();
    assert_eq!(snap.frame, 303);
    assert_eq!(snap.session, SessionState::Running);
    assert_eq!(snap.limbs, report.limbs);
    assert_eq!(snap.limbs[Limb::Right].cycle, 4);
}

#[rstest]
fn dropping_handles_detaches_without_affecting_others() {
    let ch = InProcessChannel::shared();
    let consumer = ConsumerHandle::new(ch.clone());
    {
        let producer = ProducerHandle::new(ch.clone());
        producer.set_session(SessionState::Ended);
    }
    drop(ch);
    assert_eq!(consumer.session().unwrap(), SessionState::Ended);
}

#[rstest]
fn concurrent_writer_and_reader_see_monotonic_frames() {
    let ch = InProcessChannel::shared();
    let producer = ProducerHandle::new(ch.clone());
    let monitor = MonitorHandle::new(ch);

    let writer = std::thread::spawn(move || {
        for f in 1..=5_000i64 {
            let v = f as f64;
            producer.write_frame(&MarkerFrame {
                frame: f,
                left: MarkerSample::new(v, v),
                right: MarkerSample::new(v, v),
            });
        }
    });

    let mut last = 0;
    while last < 5_000 {
        let f = monitor.input_frame();
        assert!(f >= last, "frame counter went backwards: {f} < {last}");
        if f > last {
            // samples are written before the counter, so they are at least as new
            let input = monitor.read_input();
            assert!(input.left.vertical >= f as f64);
        }
        last = f;
    }
    writer.join().unwrap();
}
