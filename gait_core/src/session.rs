//! Cooperative session lifecycle flag shared between producer and monitor.

use crate::error::GaitError;

/// Tri-state lifecycle set by the producer and polled by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    NotStarted,
    Running,
    Ended,
}

impl SessionState {
    pub const fn to_word(self) -> u64 {
        match self {
            SessionState::NotStarted => 0,
            SessionState::Running => 1,
            SessionState::Ended => 2,
        }
    }

    pub fn from_word(w: u64) -> Result<Self, GaitError> {
        match w {
            0 => Ok(SessionState::NotStarted),
            1 => Ok(SessionState::Running),
            2 => Ok(SessionState::Ended),
            other => Err(GaitError::State(format!("unknown session word {other}"))),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SessionState::NotStarted => "not_started",
            SessionState::Running => "running",
            SessionState::Ended => "ended",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_round_trip() {
        for s in [
            SessionState::NotStarted,
            SessionState::Running,
            SessionState::Ended,
        ] {
            assert_eq!(SessionState::from_word(s.to_word()), Ok(s));
        }
    }

    #[test]
    fn unknown_word_is_a_state_error() {
        assert!(matches!(
            SessionState::from_word(9),
            Err(GaitError::State(msg)) if msg.contains('9')
        ));
    }
}
