//! Human-readable error descriptions and structured JSON error formatting.

use gait_core::error::{BuildError, GaitError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::Nyquist {
                cutoff_hz,
                sample_hz,
            } => format!(
                "What happened: Filter cutoff {cutoff_hz} Hz is too high for a {sample_hz} Hz capture.\nLikely causes: filter.sample_rate_hz does not match the motion-capture rate, or cutoff_hz was raised.\nHow to fix: Keep filter.cutoff_hz below half of filter.sample_rate_hz."
            ),
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun `gait check-config`."
            ),
        };
    }

    if let Some(ge) = err.downcast_ref::<GaitError>() {
        return match ge {
            GaitError::Config(msg) => format!(
                "What happened: Configuration could not be used ({msg}).\nLikely causes: Wrong --config path, a TOML syntax error, or an out-of-range value.\nHow to fix: Fix the file and run `gait check-config` until it passes."
            ),
            GaitError::Source(msg) if msg.contains("must have headers") => {
                "Invalid headers in trial CSV. Expected 'frame,left_vertical,left_sagittal,right_vertical,right_sagittal'.".to_string()
            }
            GaitError::Source(msg) => format!(
                "What happened: Marker input failed ({msg}).\nLikely causes: Missing trial file, non-numeric cells, or frames that do not increase.\nHow to fix: Check the --input CSV; every row needs a frame >= 1 and finite positions."
            ),
            // Fallback to generic for other domain errors
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // Generic fallback
    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 2 for configuration problems, 3 for input problems, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    match err.downcast_ref::<GaitError>() {
        Some(GaitError::Config(_)) => 2,
        Some(GaitError::Source(_)) => 3,
        _ => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::InvalidConfig(_) => "InvalidConfig",
            BuildError::Nyquist { .. } => "Nyquist",
        };
    }
    match err.downcast_ref::<GaitError>() {
        Some(GaitError::Config(_)) => "Config",
        Some(GaitError::State(_)) => "State",
        Some(GaitError::Source(_)) => "Source",
        Some(GaitError::Io(_)) => "Io",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_errors_map_to_stable_codes() {
        let nyq = eyre::Report::new(BuildError::Nyquist {
            cutoff_hz: 60.0,
            sample_hz: 100.0,
        });
        assert_eq!(exit_code_for_error(&nyq), 2);
        assert!(humanize(&nyq).contains("below half"));

        let cfg = eyre::Report::new(GaitError::Config("bad".into()));
        assert_eq!(exit_code_for_error(&cfg), 2);

        let src = eyre::Report::new(GaitError::Source("no frames".into()));
        assert_eq!(exit_code_for_error(&src), 3);

        let state = eyre::Report::new(GaitError::State("unknown session word 9".into()));
        assert_eq!(exit_code_for_error(&state), 1);
        assert_eq!(exit_code_for_error(&eyre::eyre!("plain")), 1);
    }

    #[test]
    fn header_errors_get_a_short_hint() {
        let e = eyre::Report::new(GaitError::Source(
            "trial CSV must have headers frame,...".into(),
        ));
        assert!(humanize(&e).starts_with("Invalid headers in trial CSV"));
    }

    #[test]
    fn json_error_carries_reason_and_code() {
        let e = eyre::Report::new(GaitError::Source("no frames".into()));
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&e)).unwrap();
        assert_eq!(v["reason"], "Source");
        assert_eq!(v["exit_code"], 3);
        assert!(v["message"].as_str().unwrap().contains("no frames"));
    }
}
