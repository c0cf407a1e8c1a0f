#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    if let Ok(cfg) = gait_config::load_toml(data) {
        if cfg.validate().is_ok() {
            // A config that validates must survive a render/parse round trip.
            let text = toml::to_string(&cfg).unwrap();
            let again = gait_config::load_toml(&text).unwrap();
            assert!(again.validate().is_ok());
        }
    }
});
