//! Streaming swing position detection.
//!
//! A detector consumes one frame at a time, in increasing frame order, and
//! emits one [`DetectionResult`] per frame. Two algorithms are available:
//!
//! - [`Algorithm::Threshold`] classifies each frame from its spine angle alone.
//! - [`Algorithm::Peak`] tracks short histories of wrist height and spine
//!   angle and labels local maxima, with a refractory gap between repeats.
//!
//! The per-frame transition is the pure function [`step`]; [`PositionDetector`]
//! owns a [`DetectorState`] and threads it through `step` for callers that
//! prefer a mutable API.

/// Peak-tracking algorithm
pub mod peak;

/// Detector history carried between frames
pub mod state;

/// Spine-angle threshold algorithm
pub mod threshold;

use crate::angles::{compute_profile, AngleProfile};
use crate::constants::{
    BOTTOM_CONFIDENCE_SPAN, BOTTOM_SPINE_MIN, HISTORY_LEN, PEAK_CONFIDENCE, REFRACTORY_FRAMES,
    RELEASE_SPINE_MAX, SLOPE_THRESHOLD, SPINE_PEAK_MIN, TOP_SPINE_MAX, TRANSITION_CONFIDENCE,
};
use crate::landmarks::Keypoint;
use crate::posetrack::Frame;
use crate::{Error, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use state::DetectorState;

/// Swing phase label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Arms at their highest point
    Top,
    /// Deepest bend of the spine
    Bottom,
    /// Moving from top towards bottom
    Connect,
    /// Moving from bottom back up
    Release,
}

impl Position {
    /// Every position label
    pub const ALL: [Position; 4] = [Position::Top, Position::Bottom, Position::Connect, Position::Release];

    /// Lowercase label as used in annotations and exports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Position::Top => "top",
            Position::Bottom => "bottom",
            Position::Connect => "connect",
            Position::Release => "release",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Position::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown position: {s}")))
    }
}

/// Detection algorithm selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Stateless spine-angle thresholds
    Threshold,
    /// History-based peak tracking
    Peak,
}

impl Algorithm {
    /// Name accepted by [`FromStr`]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Algorithm::Threshold => "threshold",
            Algorithm::Peak => "peak",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "threshold" => Ok(Algorithm::Threshold),
            "peak" => Ok(Algorithm::Peak),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Tunable constants of both algorithms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionParams {
    /// Threshold: spine below this is a top
    pub top_spine_max: f64,
    /// Threshold: spine above this is a bottom
    pub bottom_spine_min: f64,
    /// Threshold: spine below this (and not a top) is a release
    pub release_spine_max: f64,
    /// Threshold: degrees past `bottom_spine_min` where bottom confidence reaches 1
    pub bottom_confidence_span: f64,
    /// Confidence of peak-derived labels
    pub peak_confidence: f64,
    /// Confidence of connect/release labels
    pub transition_confidence: f64,
    /// Peak: minimum spine peak value for a bottom
    pub spine_peak_min: f64,
    /// Peak: frames that must pass before repeating a top or bottom
    pub refractory_frames: u64,
    /// Peak: per-frame spine change that counts as a transition
    pub slope_threshold: f64,
    /// Peak: samples kept in each history series
    pub history_len: usize,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            top_spine_max: TOP_SPINE_MAX,
            bottom_spine_min: BOTTOM_SPINE_MIN,
            release_spine_max: RELEASE_SPINE_MAX,
            bottom_confidence_span: BOTTOM_CONFIDENCE_SPAN,
            peak_confidence: PEAK_CONFIDENCE,
            transition_confidence: TRANSITION_CONFIDENCE,
            spine_peak_min: SPINE_PEAK_MIN,
            refractory_frames: REFRACTORY_FRAMES,
            slope_threshold: SLOPE_THRESHOLD,
            history_len: HISTORY_LEN,
        }
    }
}

impl DetectionParams {
    /// Reject parameter sets the algorithms cannot run with
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the history cannot hold a 3-sample window,
    /// the bottom ramp span is not positive, the top threshold is not
    /// positive, or a confidence lies outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if self.history_len < 3 {
            return Err(Error::ConfigError(format!(
                "History length must be at least 3, got {}",
                self.history_len
            )));
        }
        if self.top_spine_max <= 0.0 {
            return Err(Error::ConfigError("Top spine threshold must be positive".to_string()));
        }
        if self.bottom_confidence_span <= 0.0 {
            return Err(Error::ConfigError("Bottom confidence span must be positive".to_string()));
        }
        for (name, value) in [
            ("Peak confidence", self.peak_confidence),
            ("Transition confidence", self.transition_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::ConfigError(format!("{name} must be between 0.0 and 1.0")));
            }
        }
        Ok(())
    }
}

/// Label and flags chosen for one frame, before frame metadata is attached
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Classification {
    /// Chosen label, `None` when no phase applies
    pub position: Option<Position>,
    /// Confidence of the label in `[0, 1]`
    pub confidence: f64,
    /// Wrist height had a local maximum on the previous frame
    pub is_arm_peak: bool,
    /// Spine angle had a qualifying local maximum on the previous frame
    pub is_spine_peak: bool,
}

impl Classification {
    fn labelled(position: Position, confidence: f64) -> Self {
        Self {
            position: Some(position),
            confidence,
            ..Self::default()
        }
    }
}

/// Detector output for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Frame index as delivered by the pose source
    pub frame_index: u64,
    /// Video time in seconds
    pub video_time: f64,
    /// Detected phase, `None` when no phase applies
    pub detected_position: Option<Position>,
    /// Confidence of the detected phase
    pub confidence: f64,
    /// Angle profile the decision was based on
    pub angles: AngleProfile,
    /// A wrist-height peak was seen, whether or not it produced a label
    pub is_arm_peak: bool,
    /// A spine peak was seen, whether or not it produced a label
    pub is_spine_peak: bool,
}

/// Pure per-frame transition shared by both algorithms.
///
/// Returns the state to use for the next frame along with this frame's
/// result. The threshold algorithm only records the frame index.
#[must_use]
pub fn step(
    algorithm: Algorithm,
    params: &DetectionParams,
    state: &DetectorState,
    frame_index: u64,
    video_time: f64,
    profile: AngleProfile,
) -> (DetectorState, DetectionResult) {
    let (next, classification) = match algorithm {
        Algorithm::Threshold => (state.clone(), threshold::classify(params, profile.spine)),
        Algorithm::Peak => peak::classify(params, state, frame_index, &profile),
    };

    let next = next.with_last_frame_index(frame_index);
    let result = DetectionResult {
        frame_index,
        video_time,
        detected_position: classification.position,
        confidence: classification.confidence,
        angles: profile,
        is_arm_peak: classification.is_arm_peak,
        is_spine_peak: classification.is_spine_peak,
    };
    (next, result)
}

/// Stateful detector over one contiguous frame sequence
#[derive(Debug, Clone)]
pub struct PositionDetector {
    algorithm: Algorithm,
    params: DetectionParams,
    state: DetectorState,
}

impl PositionDetector {
    /// Create a detector from an algorithm name
    ///
    /// # Errors
    ///
    /// Returns `UnknownAlgorithm` if the name is neither `threshold` nor `peak`
    pub fn new(algorithm: &str) -> Result<Self> {
        Ok(Self::with_algorithm(algorithm.parse()?))
    }

    /// Create a detector with default parameters
    #[must_use]
    pub fn with_algorithm(algorithm: Algorithm) -> Self {
        Self::with_params(algorithm, DetectionParams::default())
    }

    /// Create a detector with explicit parameters
    #[must_use]
    pub fn with_params(algorithm: Algorithm, params: DetectionParams) -> Self {
        Self {
            algorithm,
            params,
            state: DetectorState::default(),
        }
    }

    /// Selected algorithm
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Parameters in use
    #[must_use]
    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    /// Current history, e.g. for snapshotting a run
    #[must_use]
    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    /// Clear all history for a new frame sequence
    pub fn reset(&mut self) {
        self.state = DetectorState::default();
    }

    /// Compute the angle profile of a frame and classify it
    pub fn detect(&mut self, frame_index: u64, video_time: f64, keypoints: &[Keypoint]) -> DetectionResult {
        self.detect_profile(frame_index, video_time, compute_profile(keypoints))
    }

    /// Classify a frame from a pre-computed angle profile
    pub fn detect_profile(&mut self, frame_index: u64, video_time: f64, profile: AngleProfile) -> DetectionResult {
        if let Some(last) = self.state.last_frame_index() {
            if frame_index <= last {
                warn!("Frame {frame_index} delivered after frame {last}; peak tracking assumes increasing order");
            }
        }
        if profile.is_undetermined() {
            debug!("Frame {frame_index}: pose undetermined, angles reported as 0");
        }

        let (next, result) = step(self.algorithm, &self.params, &self.state, frame_index, video_time, profile);
        self.state = next;
        result
    }
}

/// Run a fresh detector over a whole frame sequence
#[must_use]
pub fn analyze_frames(frames: &[Frame], algorithm: Algorithm, params: &DetectionParams) -> Vec<DetectionResult> {
    let mut detector = PositionDetector::with_params(algorithm, *params);
    frames
        .iter()
        .map(|frame| detector.detect(frame.frame_index, frame.video_time, &frame.keypoints))
        .collect()
}
