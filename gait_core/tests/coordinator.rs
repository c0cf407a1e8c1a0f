use gait_core::{
    Backup, CoordinatorCfg, DetectorCfg, EventDetector, FailSafeCoordinator, GaitEvent, Limb,
    PerLimb,
};
use rstest::{fixture, rstest};

fn genuine(limb: Limb, frame: i64, cycle: u32) -> GaitEvent {
    GaitEvent {
        limb,
        frame,
        timestamp: frame as f64 * 0.01,
        cycle,
        duration: 1.0,
        synthesized: false,
    }
}

#[fixture]
fn detectors() -> PerLimb<EventDetector> {
    PerLimb::from_fn(|l| EventDetector::new(l, DetectorCfg::default()))
}

/// Give `limb`'s detector one real strike so it has a non-zero duration mean.
fn prime(d: &mut EventDetector) {
    let samples = [
        (1, 81.9513, 39.9065),
        (2, 289.3255, 140.2264),
        (4, 509.3614, 240.8251),
        (5, 495.4431, 229.5268),
        (6, 477.9329, 216.5277),
        (7, 471.8558, 209.2244),
        (8, 472.6185, 205.4473),
    ];
    for (f, v, s) in samples {
        d.step(f, v, s, f as f64 * 0.01);
    }
    assert_eq!(d.cycle(), 2);
}

#[rstest]
#[case(Limb::Left)]
#[case(Limb::Right)]
fn first_event_from_either_limb_is_accepted(
    mut detectors: PerLimb<EventDetector>,
    #[case] limb: Limb,
) {
    let mut c = FailSafeCoordinator::new(CoordinatorCfg::default());
    assert_eq!(c.last_emitting_limb(), None);
    let r = c.observe(genuine(limb, 10, 2), &mut detectors, 11, 0.11);
    assert!(r.synthesized.is_none());
    assert_eq!(r.genuine.limb, limb);
    assert_eq!(c.last_emitting_limb(), Some(limb));
}

#[rstest]
fn alternating_events_pass_through(mut detectors: PerLimb<EventDetector>) {
    let mut c = FailSafeCoordinator::new(CoordinatorCfg::default());
    let mut out = Vec::new();
    for (i, limb) in [Limb::Left, Limb::Right, Limb::Left, Limb::Right].into_iter().enumerate() {
        let f = 50 * (i as i64 + 1);
        out.extend(c.observe(genuine(limb, f, 2), &mut detectors, f + 1, 0.0).events());
    }
    assert_eq!(out.len(), 4);
    assert!(out.iter().all(|e| !e.synthesized));
}

#[rstest]
fn repeat_with_overdue_opposite_synthesizes_from_backup(mut detectors: PerLimb<EventDetector>) {
    let mut c = FailSafeCoordinator::new(CoordinatorCfg::default());
    prime(&mut detectors[Limb::Right]);
    let right_avg = detectors[Limb::Right].duration_avg();
    let right_cycle = detectors[Limb::Right].cycle();
    assert!(right_avg > 0.0);

    // Left fires, right goes overdue and keeps getting snapshotted.
    let first = c.observe(genuine(Limb::Left, 100, 3), &mut detectors, 101, 1.01);
    assert!(first.synthesized.is_none());
    assert!(c.track_phase(Limb::Right, 1.05, 150, 1.50));
    assert!(c.track_phase(Limb::Right, 1.10, 151, 1.51));
    assert_eq!(
        c.pending_backup(Limb::Right),
        Some(Backup {
            frame: 151,
            timestamp: 1.51
        })
    );

    // Left fires again: one synthetic right between the two lefts.
    let second = c.observe(genuine(Limb::Left, 200, 4), &mut detectors, 201, 2.01);
    let published: Vec<_> = first.events().chain(second.events()).collect();
    assert_eq!(
        published.iter().map(|e| e.limb).collect::<Vec<_>>(),
        vec![Limb::Left, Limb::Right, Limb::Left]
    );
    let syn = published[1];
    assert!(syn.synthesized);
    assert_eq!(syn.frame, 151);
    assert_eq!(syn.timestamp, 1.51);
    assert_eq!(syn.cycle, right_cycle + 1);
    assert_eq!(syn.duration, right_avg);

    // Opposite detector updated; duration window untouched; backup consumed.
    let right = &detectors[Limb::Right];
    assert_eq!(right.cycle(), right_cycle + 1);
    assert_eq!(right.last_event_frame(), 151);
    assert_eq!(right.last_event_time(), 1.51);
    assert_eq!(right.duration_avg(), right_avg);
    assert_eq!(c.pending_backup(Limb::Right), None);
    assert_eq!(c.last_emitting_limb(), Some(Limb::Left));
}

#[rstest]
fn phase_at_threshold_is_not_overdue() {
    let mut c = FailSafeCoordinator::new(CoordinatorCfg {
        overdue_phase: 1.5,
        ..CoordinatorCfg::default()
    });
    assert!(!c.track_phase(Limb::Left, 1.5, 10, 0.1));
    assert!(c.track_phase(Limb::Left, 1.5001, 11, 0.11));
}

#[rstest]
fn triple_repeat_synthesizes_each_time(mut detectors: PerLimb<EventDetector>) {
    let mut c = FailSafeCoordinator::new(CoordinatorCfg::default());
    let mut published = Vec::new();
    for f in [10, 110, 210] {
        published.extend(
            c.observe(genuine(Limb::Right, f, 2), &mut detectors, f + 1, f as f64 * 0.01)
                .events(),
        );
    }
    assert_eq!(published.len(), 5);
    assert_eq!(published.iter().filter(|e| e.synthesized).count(), 2);
    for pair in published.windows(2) {
        assert_ne!(pair[0].limb, pair[1].limb);
    }
    assert_eq!(detectors[Limb::Left].cycle(), 3);
}
