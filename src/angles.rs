//! Anatomical angle profile computed from a single frame of keypoints.
//!
//! The profile never fails: when a required landmark is missing, or the
//! geometry produces a non-finite value, the spine and arm angles are reported
//! as 0 and the optional parts are left empty. An all-zero profile means
//! "undetermined", not an upright posture.

use crate::constants::ANGLE_DECIMALS;
use crate::geometry::{angle_at, angle_between, midpoint, UP};
use crate::landmarks::{Keypoint, Landmark, LandmarkMap};
use serde::{Deserialize, Serialize};

/// Signed wrist offsets from the shoulder midpoint, positive when above it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WristHeights {
    /// Left wrist height
    pub left_wrist_height: f64,
    /// Right wrist height
    pub right_wrist_height: f64,
    /// Mean of both wrist heights
    pub avg_wrist_height: f64,
}

/// Angles (degrees, in `[0, 180]`) and heights derived from one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AngleProfile {
    /// Spine (hip mid to shoulder mid) against the upward axis
    pub spine: f64,
    /// Left arm (shoulder mid to left wrist) against the spine
    pub arm_to_spine: f64,
    /// Left arm against the upward axis
    pub arm_to_vertical: f64,
    /// Knee-hip-shoulder angle on the left side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hip: Option<f64>,
    /// Hip-knee-ankle angle on the left side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knee: Option<f64>,
    /// Wrist heights, present when both wrists and shoulders were found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrist_heights: Option<WristHeights>,
}

impl AngleProfile {
    /// True for the degraded all-zero profile
    #[must_use]
    pub fn is_undetermined(&self) -> bool {
        self.spine == 0.0 && self.arm_to_spine == 0.0 && self.arm_to_vertical == 0.0
    }

    /// Average wrist height, or 0 when the wrists were not resolved
    #[must_use]
    pub fn arm_height(&self) -> f64 {
        self.wrist_heights.map_or(0.0, |h| h.avg_wrist_height)
    }

    /// Resolved values keyed by their serialized names, sorted by name.
    ///
    /// The undetermined spine and arm angles are left out, as are missing
    /// optional parts.
    #[must_use]
    pub fn named_values(&self) -> Vec<(&'static str, f64)> {
        let mut values = Vec::with_capacity(8);
        if !self.is_undetermined() {
            values.extend([
                ("spine", self.spine),
                ("armToSpine", self.arm_to_spine),
                ("armToVertical", self.arm_to_vertical),
            ]);
        }
        values.extend(self.hip.map(|hip| ("hip", hip)));
        values.extend(self.knee.map(|knee| ("knee", knee)));
        if let Some(heights) = self.wrist_heights {
            values.extend([
                ("leftWristHeight", heights.left_wrist_height),
                ("rightWristHeight", heights.right_wrist_height),
                ("avgWristHeight", heights.avg_wrist_height),
            ]);
        }
        values.sort_by_key(|&(name, _)| name);
        values
    }
}

/// Compute the angle profile for one frame of keypoints
#[must_use]
pub fn compute_profile(keypoints: &[Keypoint]) -> AngleProfile {
    profile_from_map(&LandmarkMap::from_keypoints(keypoints))
}

/// Compute the angle profile from an already resolved landmark map
#[must_use]
pub fn profile_from_map(map: &LandmarkMap) -> AngleProfile {
    let wrist_heights = compute_wrist_heights(map);
    match compute_angles(map) {
        Some(angles) => AngleProfile {
            wrist_heights,
            ..angles
        },
        None => AngleProfile {
            wrist_heights,
            ..AngleProfile::default()
        },
    }
}

/// Wrist heights relative to the shoulder midpoint.
///
/// Screen Y grows downward, so `shoulder_y - wrist_y` is positive when the
/// wrist is raised above the shoulders.
#[must_use]
pub fn compute_wrist_heights(map: &LandmarkMap) -> Option<WristHeights> {
    let left_shoulder = map.get(Landmark::LeftShoulder)?;
    let right_shoulder = map.get(Landmark::RightShoulder)?;
    let left_wrist = map.get(Landmark::LeftWrist)?;
    let right_wrist = map.get(Landmark::RightWrist)?;

    let shoulder_mid_y = midpoint(left_shoulder, right_shoulder).y;
    let left = shoulder_mid_y - left_wrist.y;
    let right = shoulder_mid_y - right_wrist.y;
    let heights = WristHeights {
        left_wrist_height: left,
        right_wrist_height: right,
        avg_wrist_height: (left + right) / 2.0,
    };

    heights.avg_wrist_height.is_finite().then_some(heights)
}

fn compute_angles(map: &LandmarkMap) -> Option<AngleProfile> {
    let left_shoulder = map.get(Landmark::LeftShoulder)?;
    let right_shoulder = map.get(Landmark::RightShoulder)?;
    let left_hip = map.get(Landmark::LeftHip)?;
    let right_hip = map.get(Landmark::RightHip)?;
    let left_wrist = map.get(Landmark::LeftWrist)?;
    let left_knee = map.get(Landmark::LeftKnee)?;
    let left_ankle = map.get(Landmark::LeftAnkle)?;

    let shoulder_mid = midpoint(left_shoulder, right_shoulder);
    let hip_mid = midpoint(left_hip, right_hip);

    let spine_vec = shoulder_mid.sub(hip_mid);
    let arm_vec = left_wrist.sub(shoulder_mid);
    if !spine_vec.is_finite() || !arm_vec.is_finite() {
        return None;
    }

    let angles = [
        angle_between(spine_vec, UP),
        angle_between(arm_vec, spine_vec),
        angle_between(arm_vec, UP),
        angle_at(left_knee, left_hip, left_shoulder),
        angle_at(left_hip, left_knee, left_ankle),
    ];
    if angles.iter().any(|a| !a.is_finite()) {
        return None;
    }
    let [spine, arm_to_spine, arm_to_vertical, hip, knee] = angles.map(round_angle);

    Some(AngleProfile {
        spine,
        arm_to_spine,
        arm_to_vertical,
        hip: Some(hip),
        knee: Some(knee),
        wrist_heights: None,
    })
}

fn round_angle(value: f64) -> f64 {
    let scale = 10f64.powi(ANGLE_DECIMALS);
    (value * scale).round() / scale
}
