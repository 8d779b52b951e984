//! Posetrack documents and annotation files.
//!
//! A posetrack is the JSON output of the pose extraction step: a metadata
//! block and one entry per video frame with its keypoints. Frames without a
//! `videoTime` are timed from their index and the frame rate.

use crate::constants::DEFAULT_FPS;
use crate::evaluation::GroundTruth;
use crate::landmarks::Keypoint;
use crate::{Error, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One frame of keypoints as delivered by the pose source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Frame number, strictly increasing within a sequence
    pub frame_index: u64,
    /// Presentation time in seconds
    pub video_time: f64,
    /// Detected keypoints, possibly empty
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
}

/// Descriptive fields of a posetrack; all optional
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoseTrackMetadata {
    /// Frame rate of the source video
    pub fps: Option<f64>,
    /// Source video file name
    pub source_video_name: Option<String>,
    /// Source video duration in seconds
    pub source_video_duration: Option<f64>,
    /// Keypoint layout, e.g. `blazepose-33`
    pub keypoint_format: Option<String>,
    /// Number of frames the extractor wrote
    pub frame_count: Option<usize>,
}

/// A full posetrack document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseTrack {
    /// Document metadata
    #[serde(default)]
    pub metadata: PoseTrackMetadata,
    /// Frames in delivery order
    pub frames: Vec<Frame>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFrame {
    frame_index: u64,
    video_time: Option<f64>,
    #[serde(default)]
    keypoints: Vec<Keypoint>,
}

#[derive(Deserialize)]
struct RawPoseTrack {
    #[serde(default)]
    metadata: PoseTrackMetadata,
    frames: Vec<RawFrame>,
}

impl PoseTrack {
    /// Parse a posetrack from JSON text.
    ///
    /// `default_fps` is used to time frames lacking `videoTime` when the
    /// metadata carries no frame rate either.
    ///
    /// # Errors
    ///
    /// Returns `Json` on malformed input and `InvalidInput` when the frame
    /// rate is not positive.
    pub fn from_json(json: &str, default_fps: f64) -> Result<Self> {
        let raw: RawPoseTrack = serde_json::from_str(json)?;
        Self::from_raw(raw, default_fps)
    }

    /// Load a posetrack JSON file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be opened, otherwise as [`Self::from_json`]
    pub fn from_file<P: AsRef<Path>>(path: P, default_fps: f64) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let raw: RawPoseTrack = serde_json::from_reader(reader)?;
        let track = Self::from_raw(raw, default_fps)?;
        info!(
            "Loaded {} frames from {} ({} fps)",
            track.frames.len(),
            path.display(),
            track.fps(default_fps)
        );
        Ok(track)
    }

    #[allow(clippy::cast_precision_loss)]
    fn from_raw(raw: RawPoseTrack, default_fps: f64) -> Result<Self> {
        let fps = raw.metadata.fps.unwrap_or(default_fps);
        if !(fps.is_finite() && fps > 0.0) {
            return Err(Error::InvalidInput(format!("Frame rate must be positive, got {fps}")));
        }

        let frames: Vec<Frame> = raw
            .frames
            .into_iter()
            .map(|frame| Frame {
                frame_index: frame.frame_index,
                video_time: frame.video_time.unwrap_or(frame.frame_index as f64 / fps),
                keypoints: frame.keypoints,
            })
            .collect();

        if frames.windows(2).any(|pair| pair[1].frame_index <= pair[0].frame_index) {
            warn!("Posetrack frames are not in strictly increasing frame order");
        }

        Ok(Self {
            metadata: raw.metadata,
            frames,
        })
    }

    /// Frame rate from metadata, or `default_fps`
    #[must_use]
    pub fn fps(&self, default_fps: f64) -> f64 {
        self.metadata.fps.unwrap_or(default_fps)
    }

    /// Frame at a list position (not a `frameIndex`)
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` naming the valid range when `position` is past
    /// the last frame
    pub fn frame_at(&self, position: usize) -> Result<&Frame> {
        self.frames.get(position).ok_or_else(|| match self.frames.len() {
            0 => Error::InvalidInput(format!("Frame {position} out of range (posetrack has no frames)")),
            len => Error::InvalidInput(format!("Frame {position} out of range (0-{})", len - 1)),
        })
    }
}

/// Load a posetrack with the default 30 fps fallback
///
/// # Errors
///
/// See [`PoseTrack::from_file`]
pub fn load_posetrack<P: AsRef<Path>>(path: P) -> Result<PoseTrack> {
    PoseTrack::from_file(path, DEFAULT_FPS)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnnotationFile {
    List(Vec<GroundTruth>),
    Template { annotations: Vec<GroundTruth> },
}

/// Parse ground truth from JSON text.
///
/// Accepts either a bare list of `{frame_index, position, notes?}` records
/// or an annotation template object, whose `annotations` field is used.
///
/// # Errors
///
/// Returns `Json` if the text is neither form
pub fn parse_annotations(json: &str) -> Result<Vec<GroundTruth>> {
    let file: AnnotationFile = serde_json::from_str(json)?;
    Ok(match file {
        AnnotationFile::List(list) | AnnotationFile::Template { annotations: list } => list,
    })
}

/// Load ground truth from a file, see [`parse_annotations`]
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, otherwise as [`parse_annotations`]
pub fn load_annotations<P: AsRef<Path>>(path: P) -> Result<Vec<GroundTruth>> {
    let path = path.as_ref();
    let annotations = parse_annotations(&std::fs::read_to_string(path)?)?;
    info!("Loaded {} annotations from {}", annotations.len(), path.display());
    Ok(annotations)
}
