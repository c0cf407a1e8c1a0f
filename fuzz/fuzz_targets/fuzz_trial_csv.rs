#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(rows) = gait_config::parse_trial_csv(data) {
        assert!(!rows.is_empty());
        assert!(rows.windows(2).all(|w| w[0].frame < w[1].frame));
        assert!(rows.iter().all(|r| r.frame >= 1 && r.left_vertical.is_finite()));
    }
});
