use gait_core::{
    CoordinatorCfg, DetectorCfg, EventDetector, FailSafeCoordinator, GaitEvent, Limb, PerLimb,
    RollingWindow,
};
use proptest::prelude::*;

prop_compose! {
    fn limb_sequence()(bits in prop::collection::vec(any::<bool>(), 1..64)) -> Vec<Limb> {
        bits.into_iter().map(|b| if b { Limb::Left } else { Limb::Right }).collect()
    }
}

proptest! {
    #[test]
    fn window_mean_is_mean_of_last_n(
        cap in 1usize..=32,
        values in prop::collection::vec(0.01f64..5.0, 1..100),
    ) {
        let mut w = RollingWindow::with_capacity(cap);
        for v in &values {
            w.push(*v);
        }
        let tail = &values[values.len().saturating_sub(cap)..];
        let expected = tail.iter().sum::<f64>() / tail.len() as f64;
        prop_assert_eq!(w.len(), tail.len());
        prop_assert!((w.mean() - expected).abs() < 1e-9);
    }

    #[test]
    fn published_stream_always_alternates(
        limbs in limb_sequence(),
        overdue in prop::collection::vec(any::<bool>(), 64),
    ) {
        let mut c = FailSafeCoordinator::new(CoordinatorCfg::default());
        let mut detectors = PerLimb::from_fn(|l| EventDetector::new(l, DetectorCfg::default()));
        let mut published: Vec<GaitEvent> = Vec::new();
        let mut repeats = 0usize;
        let mut prev = None;

        for (i, limb) in limbs.iter().copied().enumerate() {
            let frame = 10 * (i as i64 + 1);
            let now = frame as f64 * 0.01;
            if prev == Some(limb) {
                repeats += 1;
            }
            prev = Some(limb);
            let ev = GaitEvent {
                limb,
                frame,
                timestamp: now,
                cycle: detectors[limb].cycle() + 1,
                duration: 1.0,
                synthesized: false,
            };
            published.extend(c.observe(ev, &mut detectors, frame, now).events());
            if overdue[i] {
                c.track_phase(limb.opposite(), 2.0, frame + 5, now + 0.05);
            }
        }

        for pair in published.windows(2) {
            prop_assert_ne!(pair[0].limb, pair[1].limb);
        }
        // at most one synthetic event per missed strike
        let synthesized = published.iter().filter(|e| e.synthesized).count();
        prop_assert_eq!(synthesized, repeats);
        prop_assert_eq!(published.len(), limbs.len() + repeats);
    }
}
