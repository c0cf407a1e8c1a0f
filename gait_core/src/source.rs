//! In-memory marker source for replays and tests.

use std::collections::VecDeque;

use gait_traits::{MarkerFrame, MarkerSource};

/// Yields a fixed sequence of frames, then end of data.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSource {
    frames: VecDeque<MarkerFrame>,
}

impl ScriptedSource {
    pub fn new(frames: impl IntoIterator<Item = MarkerFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn from_rows(rows: &[gait_config::TrialRow]) -> Self {
        Self::new(rows.iter().map(crate::conversions::frame_from_row))
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl MarkerSource for ScriptedSource {
    fn next_frame(&mut self) -> Result<Option<MarkerFrame>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.frames.pop_front())
    }
}

impl Iterator for ScriptedSource {
    type Item = MarkerFrame;

    fn next(&mut self) -> Option<MarkerFrame> {
        self.frames.pop_front()
    }
}
