//! Offline analysis over a whole posetrack.
//!
//! Unlike the streaming detector these helpers see every frame at once, so
//! they can smooth the series and look ahead when searching for peaks. They
//! produce annotation candidates and summaries for manual review.

use crate::angles::{compute_profile, AngleProfile};
use crate::constants::{
    CANDIDATE_BOTTOM_MIN_SPINE, CANDIDATE_TOP_MAX_SPINE, CANDIDATE_TOP_MIN_ARM_HEIGHT,
    DEFAULT_CANDIDATE_MIN_DISTANCE, DEFAULT_SMOOTHING_WINDOW,
};
use crate::detection::{DetectionResult, Position};
use crate::evaluation::GroundTruth;
use crate::posetrack::{Frame, PoseTrack};
use crate::signal::{find_peaks, smooth};
use crate::{Error, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Parameters of candidate generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateConfig {
    /// Moving-average window applied to both series
    pub smoothing_window: usize,
    /// Minimum frame spacing between peaks of the same series
    pub min_distance: usize,
    /// A top candidate needs the raw spine angle below this
    pub top_max_spine: f64,
    /// A top candidate needs the raw wrist height above this
    pub top_min_arm_height: f64,
    /// Spine peaks below this are not bottom candidates
    pub bottom_min_spine: f64,
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            min_distance: DEFAULT_CANDIDATE_MIN_DISTANCE,
            top_max_spine: CANDIDATE_TOP_MAX_SPINE,
            top_min_arm_height: CANDIDATE_TOP_MIN_ARM_HEIGHT,
            bottom_min_spine: CANDIDATE_BOTTOM_MIN_SPINE,
        }
    }
}

impl CandidateConfig {
    /// Reject unusable settings
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the smoothing window is 0
    pub fn validate(&self) -> Result<()> {
        if self.smoothing_window == 0 {
            return Err(Error::ConfigError(
                "Smoothing window size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// A frame proposed for annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Proposed frame
    pub frame_index: u64,
    /// Its video time in seconds
    pub video_time: f64,
    /// Proposed label
    pub position: Position,
    /// Human-readable justification
    pub reason: String,
}

/// Top and bottom candidates found in one posetrack
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandidateSet {
    /// Arm-height peaks with an upright spine
    pub top: Vec<Candidate>,
    /// Spine-angle peaks
    pub bottom: Vec<Candidate>,
}

/// One row of the arm height ranking
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmHeightSample {
    /// Frame
    pub frame_index: u64,
    /// Video time in seconds
    pub video_time: f64,
    /// Average wrist height above the shoulders
    pub arm_height: f64,
    /// Arm angle against vertical
    pub arm_to_vertical: f64,
    /// Spine angle
    pub spine: f64,
}

/// Frames with known wrist heights, highest arms first
#[must_use]
pub fn rank_arm_heights(frames: &[Frame]) -> Vec<ArmHeightSample> {
    let mut samples: Vec<ArmHeightSample> = frames
        .iter()
        .filter_map(|frame| {
            let profile = compute_profile(&frame.keypoints);
            profile.wrist_heights.map(|heights| ArmHeightSample {
                frame_index: frame.frame_index,
                video_time: frame.video_time,
                arm_height: heights.avg_wrist_height,
                arm_to_vertical: profile.arm_to_vertical,
                spine: profile.spine,
            })
        })
        .collect();

    // Stable sort keeps frame order among equal heights
    samples.sort_by(|a, b| b.arm_height.partial_cmp(&a.arm_height).unwrap_or(Ordering::Equal));
    samples
}

/// Propose top and bottom frames for manual annotation
#[must_use]
pub fn generate_candidates(frames: &[Frame], config: &CandidateConfig) -> CandidateSet {
    let profiles: Vec<_> = frames.iter().map(|frame| compute_profile(&frame.keypoints)).collect();
    let arm_heights: Vec<f64> = profiles.iter().map(|p| p.arm_height()).collect();
    let spines: Vec<f64> = profiles.iter().map(|p| p.spine).collect();

    let arm_smooth = smooth(&arm_heights, config.smoothing_window);
    let spine_smooth = smooth(&spines, config.smoothing_window);

    let top = find_peaks(&arm_smooth, config.min_distance, None)
        .into_iter()
        .filter(|&i| spines[i] < config.top_max_spine && arm_heights[i] > config.top_min_arm_height)
        .map(|i| Candidate {
            frame_index: frames[i].frame_index,
            video_time: frames[i].video_time,
            position: Position::Top,
            reason: format!("arm_peak with spine={:.1}, arm_h={:.1}", spines[i], arm_heights[i]),
        })
        .collect::<Vec<_>>();

    let bottom = find_peaks(&spine_smooth, config.min_distance, Some(config.bottom_min_spine))
        .into_iter()
        .map(|i| Candidate {
            frame_index: frames[i].frame_index,
            video_time: frames[i].video_time,
            position: Position::Bottom,
            reason: format!("spine_peak at {:.1}", spines[i]),
        })
        .collect::<Vec<_>>();

    info!("Found {} top and {} bottom candidates in {} frames", top.len(), bottom.len(), frames.len());
    CandidateSet { top, bottom }
}

/// Source description carried in an annotation template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    /// Source video name, `unknown` when the posetrack does not say
    pub source: String,
    /// Number of frames in the posetrack
    pub frame_count: usize,
    /// Frame rate used for timing
    pub fps: f64,
}

/// Angles of one frame as listed in an annotation template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAngles {
    /// Frame
    pub frame_index: u64,
    /// Video time in seconds
    pub video_time: f64,
    /// Angle profile of the frame
    pub angles: AngleProfile,
}

/// Annotation file skeleton for manual labelling.
///
/// Reviewers move confirmed candidates into `annotations`; the file can
/// then be read back with [`crate::posetrack::load_annotations`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationTemplate {
    /// Source description
    pub metadata: TemplateMetadata,
    /// Automatically proposed frames
    pub candidates: CandidateSet,
    /// Confirmed annotations, empty when generated
    #[serde(default)]
    pub annotations: Vec<GroundTruth>,
    /// Per-frame angles for reference
    #[serde(default)]
    pub frames: Vec<FrameAngles>,
}

/// Build an annotation template for a whole posetrack
#[must_use]
pub fn build_template(track: &PoseTrack, config: &CandidateConfig, default_fps: f64) -> AnnotationTemplate {
    let frames = track
        .frames
        .iter()
        .map(|frame| FrameAngles {
            frame_index: frame.frame_index,
            video_time: frame.video_time,
            angles: compute_profile(&frame.keypoints),
        })
        .collect();

    AnnotationTemplate {
        metadata: TemplateMetadata {
            source: track
                .metadata
                .source_video_name
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            frame_count: track.frames.len(),
            fps: track.fps(default_fps),
        },
        candidates: generate_candidates(&track.frames, config),
        annotations: Vec::new(),
        frames,
    }
}

/// Label counts of one detector run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DetectionSummary {
    /// Frames per detected position
    pub position_counts: BTreeMap<Position, usize>,
    /// Frames with no detected position
    pub unlabelled: usize,
    /// Frames flagged as wrist-height peaks
    pub arm_peaks: usize,
    /// Frames flagged as spine peaks
    pub spine_peaks: usize,
}

impl DetectionSummary {
    /// Number of frames detected as `position`
    #[must_use]
    pub fn count(&self, position: Position) -> usize {
        self.position_counts.get(&position).copied().unwrap_or(0)
    }
}

/// Count labels and peak flags across a run
#[must_use]
pub fn summarize(results: &[DetectionResult]) -> DetectionSummary {
    let mut summary = DetectionSummary::default();
    for result in results {
        match result.detected_position {
            Some(position) => *summary.position_counts.entry(position).or_default() += 1,
            None => summary.unlabelled += 1,
        }
        summary.arm_peaks += usize::from(result.is_arm_peak);
        summary.spine_peaks += usize::from(result.is_spine_peak);
    }
    summary
}
