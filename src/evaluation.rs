//! Scoring detector output against hand-labelled ground truth.
//!
//! Matching is tolerance based and runs independently in both directions: a
//! detection is a true positive if any annotation of the same position lies
//! within the tolerance, and an annotation is a false negative if no
//! detection does. One annotation may therefore confirm several nearby
//! detections.

use crate::constants::DEFAULT_TOLERANCE_FRAMES;
use crate::detection::{DetectionResult, Position};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A hand-labelled position at one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruth {
    /// Annotated frame
    pub frame_index: u64,
    /// Annotated position
    pub position: Position,
    /// Free-form annotator notes
    #[serde(default)]
    pub notes: String,
}

impl GroundTruth {
    /// Annotation without notes
    #[must_use]
    pub fn new(frame_index: u64, position: Position) -> Self {
        Self {
            frame_index,
            position,
            notes: String::new(),
        }
    }
}

/// Kind of mismatch recorded in [`AlgorithmMetrics::position_errors`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Detected with no annotation nearby
    FalsePositive,
    /// Annotated with no detection nearby
    FalseNegative,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::FalsePositive => "false_positive",
            ErrorKind::FalseNegative => "false_negative",
        })
    }
}

/// A single mismatch between detections and annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionError {
    /// Mismatch kind
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    /// Frame at which it occurred
    pub frame: u64,
}

/// Counts and derived scores for one position
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlgorithmMetrics {
    /// Detections with an annotation within tolerance
    pub true_positives: usize,
    /// Detections with no annotation within tolerance
    pub false_positives: usize,
    /// Annotations with no detection within tolerance
    pub false_negatives: usize,
    /// Number of frames processed by the detector
    pub total_frames: usize,
    /// Every false positive followed by every false negative, each in frame order
    pub position_errors: Vec<PositionError>,
}

impl AlgorithmMetrics {
    /// `tp / (tp + fp)`, or 0 with no detections
    #[must_use]
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// `tp / (tp + fn)`, or 0 with no annotations
    #[must_use]
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Harmonic mean of precision and recall, or 0 when both are 0
    #[must_use]
    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Evaluate one position with the default ±2 frame tolerance
#[must_use]
pub fn evaluate(results: &[DetectionResult], ground_truth: &[GroundTruth], position: Position) -> AlgorithmMetrics {
    evaluate_with_tolerance(results, ground_truth, position, DEFAULT_TOLERANCE_FRAMES)
}

/// Evaluate one position, matching frames at most `tolerance` apart
#[must_use]
pub fn evaluate_with_tolerance(
    results: &[DetectionResult],
    ground_truth: &[GroundTruth],
    position: Position,
    tolerance: u64,
) -> AlgorithmMetrics {
    let detected: BTreeSet<u64> = results
        .iter()
        .filter(|r| r.detected_position == Some(position))
        .map(|r| r.frame_index)
        .collect();
    let annotated: BTreeSet<u64> = ground_truth
        .iter()
        .filter(|gt| gt.position == position)
        .map(|gt| gt.frame_index)
        .collect();

    let within = |frame: u64, others: &BTreeSet<u64>| {
        others
            .range(frame.saturating_sub(tolerance)..=frame.saturating_add(tolerance))
            .next()
            .is_some()
    };

    let mut metrics = AlgorithmMetrics {
        total_frames: results.len(),
        ..AlgorithmMetrics::default()
    };

    for &frame in &detected {
        if within(frame, &annotated) {
            metrics.true_positives += 1;
        } else {
            metrics.false_positives += 1;
            metrics.position_errors.push(PositionError {
                kind: ErrorKind::FalsePositive,
                frame,
            });
        }
    }

    for &frame in &annotated {
        if !within(frame, &detected) {
            metrics.false_negatives += 1;
            metrics.position_errors.push(PositionError {
                kind: ErrorKind::FalseNegative,
                frame,
            });
        }
    }

    debug!(
        "{position}: tp={} fp={} fn={} over {} frames",
        metrics.true_positives, metrics.false_positives, metrics.false_negatives, metrics.total_frames
    );
    metrics
}
