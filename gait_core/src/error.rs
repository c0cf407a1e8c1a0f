use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GaitError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid state: {0}")]
    State(String),
    #[error("marker source error: {0}")]
    Source(String),
    #[error("io error: {0}")]
    Io(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("sample rate {sample_hz} Hz must exceed twice the cutoff {cutoff_hz} Hz")]
    Nyquist { cutoff_hz: f64, sample_hz: f64 },
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
