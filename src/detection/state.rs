use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Arm height and spine angle of the most recent frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Average wrist height
    pub arm_height: f64,
    /// Spine angle in degrees
    pub spine: f64,
}

/// History carried from one frame to the next.
///
/// Values are never mutated in place: each transition builds a new state, so
/// a snapshot taken at any frame can be replayed or serialized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectorState {
    arm_history: VecDeque<f64>,
    spine_history: VecDeque<f64>,
    last_top_frame: Option<u64>,
    last_bottom_frame: Option<u64>,
    previous: Option<Sample>,
    last_frame_index: Option<u64>,
}

impl DetectorState {
    /// Recent wrist heights, oldest first
    #[must_use]
    pub fn arm_history(&self) -> &VecDeque<f64> {
        &self.arm_history
    }

    /// Recent spine angles, oldest first
    #[must_use]
    pub fn spine_history(&self) -> &VecDeque<f64> {
        &self.spine_history
    }

    /// Frame of the last emitted top
    #[must_use]
    pub fn last_top_frame(&self) -> Option<u64> {
        self.last_top_frame
    }

    /// Frame of the last emitted bottom
    #[must_use]
    pub fn last_bottom_frame(&self) -> Option<u64> {
        self.last_bottom_frame
    }

    /// Values seen on the previous frame
    #[must_use]
    pub fn previous(&self) -> Option<Sample> {
        self.previous
    }

    /// Index of the last frame processed
    #[must_use]
    pub fn last_frame_index(&self) -> Option<u64> {
        self.last_frame_index
    }

    /// Append a sample to both series, dropping the oldest past `capacity`
    #[must_use]
    pub(crate) fn with_sample(mut self, sample: Sample, capacity: usize) -> Self {
        push_bounded(&mut self.arm_history, sample.arm_height, capacity);
        push_bounded(&mut self.spine_history, sample.spine, capacity);
        self
    }

    #[must_use]
    pub(crate) fn with_previous(mut self, sample: Sample) -> Self {
        self.previous = Some(sample);
        self
    }

    #[must_use]
    pub(crate) fn with_last_top(mut self, frame_index: u64) -> Self {
        self.last_top_frame = Some(frame_index);
        self
    }

    #[must_use]
    pub(crate) fn with_last_bottom(mut self, frame_index: u64) -> Self {
        self.last_bottom_frame = Some(frame_index);
        self
    }

    #[must_use]
    pub(crate) fn with_last_frame_index(mut self, frame_index: u64) -> Self {
        self.last_frame_index = Some(frame_index);
        self
    }
}

fn push_bounded(history: &mut VecDeque<f64>, value: f64, capacity: usize) {
    if history.len() >= capacity {
        history.pop_front();
    }
    history.push_back(value);
}

/// Middle value of the last three samples when it is a local maximum.
///
/// The rise must be strict and the fall may be flat, so the first sample of
/// a plateau counts as the peak.
#[must_use]
pub fn trailing_peak(history: &VecDeque<f64>) -> Option<f64> {
    let n = history.len();
    if n < 3 {
        return None;
    }
    let (prev2, prev1, curr) = (history[n - 3], history[n - 2], history[n - 1]);
    (prev1 > prev2 && prev1 >= curr).then_some(prev1)
}
