pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

/// One marker's position on the two axes the detector consumes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarkerSample {
    pub vertical: f64,
    pub sagittal: f64,
}

impl MarkerSample {
    pub const fn new(vertical: f64, sagittal: f64) -> Self {
        Self { vertical, sagittal }
    }
}

/// Raw heel-marker positions for both limbs at one capture tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarkerFrame {
    /// Capture frame counter; increases by at least one per tick.
    pub frame: i64,
    pub left: MarkerSample,
    pub right: MarkerSample,
}

/// Upstream producer of marker frames (motion-capture client, file replay, ...).
///
/// `Ok(None)` signals end of data.
pub trait MarkerSource {
    fn next_frame(&mut self) -> Result<Option<MarkerFrame>, Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: MarkerSource + ?Sized> MarkerSource for Box<T> {
    fn next_frame(&mut self) -> Result<Option<MarkerFrame>, Box<dyn std::error::Error + Send + Sync>> {
        (**self).next_frame()
    }
}
