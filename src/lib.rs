//! Swing position detection from 2-D pose keypoint sequences.
//!
//! This library classifies each frame of a pose sequence (keypoints produced
//! by an external pose-estimation model) into the swing phases `top`,
//! `bottom`, `connect` and `release`, and scores those labels against
//! hand-made annotations.
//!
//! The analysis pipeline consists of:
//! 1. Resolving keypoints into named landmarks, by name or by position
//! 2. Deriving spine, arm, hip and knee angles plus wrist heights per frame
//! 3. Streaming the per-frame profiles through a position detector
//! 4. Evaluating the detections with tolerance-based matching
//!
//! # Examples
//!
//! ## Detecting Positions
//!
//! ```no_run
//! use swing_position_detection::{detection::PositionDetector, posetrack::load_posetrack};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let track = load_posetrack("swing.posetrack.json")?;
//! let mut detector = PositionDetector::new("peak")?;
//!
//! for frame in &track.frames {
//!     let result = detector.detect(frame.frame_index, frame.video_time, &frame.keypoints);
//!     if let Some(position) = result.detected_position {
//!         println!("Frame {}: {} ({:.2})", result.frame_index, position, result.confidence);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Evaluating Against Annotations
//!
//! ```no_run
//! use swing_position_detection::{
//!     detection::{analyze_frames, Algorithm, DetectionParams, Position},
//!     evaluation::evaluate,
//!     posetrack::{load_annotations, load_posetrack},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let track = load_posetrack("swing.posetrack.json")?;
//! let ground_truth = load_annotations("swing.annotations.json")?;
//!
//! let results = analyze_frames(&track.frames, Algorithm::Peak, &DetectionParams::default());
//! let metrics = evaluate(&results, &ground_truth, Position::Top);
//! println!("Top F1: {:.2}", metrics.f1());
//! # Ok(())
//! # }
//! ```
//!
//! ## Replaying From a State Snapshot
//!
//! ```
//! use swing_position_detection::angles::AngleProfile;
//! use swing_position_detection::detection::{step, Algorithm, DetectionParams, DetectorState};
//!
//! let params = DetectionParams::default();
//! let mut state = DetectorState::default();
//! for (i, spine) in [20.0, 40.0, 70.0, 65.0].into_iter().enumerate() {
//!     let profile = AngleProfile { spine, ..AngleProfile::default() };
//!     let (next, result) = step(Algorithm::Peak, &params, &state, i as u64, 0.0, profile);
//!     state = next;
//!     println!("{:?}", result.detected_position);
//! }
//! ```

/// 2-D vector and angle math
pub mod geometry;

/// Keypoints and the landmark vocabulary
pub mod landmarks;

/// Per-frame anatomical angle profiles
pub mod angles;

/// Peak finding and smoothing over numeric series
pub mod signal;

/// Streaming position detection
pub mod detection;

/// Scoring detections against ground truth
pub mod evaluation;

/// Offline candidate generation and run summaries
pub mod candidates;

/// Posetrack and annotation file loading
pub mod posetrack;

/// CSV export of detection results
pub mod export;

/// Error types and result handling
pub mod error;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
