//! Helper functions and utilities for tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use swing_position_detection::{
    landmarks::{Keypoint, Landmark},
    posetrack::{Frame, PoseTrack, PoseTrackMetadata},
    Result,
};

/// Synthetic pose: hips centred at the origin, spine leaning `spine_deg` from
/// vertical with length 100, both wrists `arm_height` above the shoulder
/// midpoint, left leg straight down.
pub fn pose_points(spine_deg: f64, arm_height: f64) -> Vec<(Landmark, f64, f64)> {
    let (sin, cos) = spine_deg.to_radians().sin_cos();
    let (sx, sy) = (100.0 * sin, -100.0 * cos);
    vec![
        (Landmark::LeftShoulder, sx - 10.0, sy),
        (Landmark::RightShoulder, sx + 10.0, sy),
        (Landmark::LeftWrist, sx + 30.0, sy - arm_height),
        (Landmark::RightWrist, sx + 30.0, sy - arm_height),
        (Landmark::LeftHip, -10.0, 0.0),
        (Landmark::RightHip, 10.0, 0.0),
        (Landmark::LeftKnee, -10.0, 100.0),
        (Landmark::LeftAnkle, -10.0, 200.0),
    ]
}

/// Named keypoints for [`pose_points`]
pub fn named_pose(spine_deg: f64, arm_height: f64) -> Vec<Keypoint> {
    pose_points(spine_deg, arm_height)
        .into_iter()
        .map(|(landmark, x, y)| Keypoint::named(landmark, x, y))
        .collect()
}

/// Full unnamed 33-point list for [`pose_points`]; unused slots sit at the origin
pub fn positional_pose(spine_deg: f64, arm_height: f64) -> Vec<Keypoint> {
    let mut keypoints = vec![Keypoint::new(0.0, 0.0); 33];
    for (landmark, x, y) in pose_points(spine_deg, arm_height) {
        keypoints[landmark.index()] = Keypoint::new(x, y);
    }
    keypoints
}

/// Frames at 30 fps from `(spine_deg, arm_height)` pairs, numbered from 0
pub fn frames_from(samples: &[(f64, f64)]) -> Vec<Frame> {
    samples
        .iter()
        .enumerate()
        .map(|(i, &(spine, arm))| {
            let frame_index = i as u64;
            Frame {
                frame_index,
                video_time: frame_index as f64 / 30.0,
                keypoints: named_pose(spine, arm),
            }
        })
        .collect()
}

/// Serialize frames as a posetrack document into `dir`
pub fn write_posetrack(dir: &Path, name: &str, frames: Vec<Frame>, fps: Option<f64>) -> Result<PathBuf> {
    let track = PoseTrack {
        metadata: PoseTrackMetadata {
            fps,
            source_video_name: Some("synthetic.mp4".to_string()),
            frame_count: Some(frames.len()),
            ..PoseTrackMetadata::default()
        },
        frames,
    };
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(&track)?)?;
    Ok(path)
}
