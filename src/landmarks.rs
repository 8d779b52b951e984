//! Keypoints and the BlazePose-33 landmark vocabulary.
//!
//! Pose sources deliver keypoints either with a `name` from the vocabulary or
//! as a bare positional list. [`LandmarkMap`] resolves both into one lookup
//! table per frame: named entries win, and positions only fill the gaps.

use crate::constants::NUM_BLAZEPOSE_LANDMARKS;
use crate::geometry::Point2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single detected body point as produced by the pose model
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Keypoint {
    /// Horizontal image coordinate (pixels or normalized)
    pub x: f64,
    /// Vertical image coordinate, growing downward
    pub y: f64,
    /// Relative depth, if the model provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Visibility / confidence in `[0, 1]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Landmark name, e.g. `left_shoulder`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Keypoint {
    /// Unnamed keypoint, resolved by its position in the list
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Keypoint carrying a landmark name
    #[must_use]
    pub fn named(landmark: Landmark, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            name: Some(landmark.name().to_string()),
            ..Self::default()
        }
    }

    /// Image position of this keypoint
    #[must_use]
    pub fn point(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

macro_rules! landmarks {
    ($($variant:ident = $index:literal => $name:literal,)*) => {
        /// BlazePose-33 landmark identifiers; the discriminant is the positional index
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[allow(missing_docs)]
        pub enum Landmark {
            $($variant = $index,)*
        }

        impl Landmark {
            /// Every landmark in index order
            pub const ALL: [Landmark; NUM_BLAZEPOSE_LANDMARKS] = [$(Landmark::$variant,)*];

            /// Canonical lowercase name
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Landmark::$variant => $name,)*
                }
            }
        }
    };
}

landmarks! {
    Nose = 0 => "nose",
    LeftEyeInner = 1 => "left_eye_inner",
    LeftEye = 2 => "left_eye",
    LeftEyeOuter = 3 => "left_eye_outer",
    RightEyeInner = 4 => "right_eye_inner",
    RightEye = 5 => "right_eye",
    RightEyeOuter = 6 => "right_eye_outer",
    LeftEar = 7 => "left_ear",
    RightEar = 8 => "right_ear",
    MouthLeft = 9 => "mouth_left",
    MouthRight = 10 => "mouth_right",
    LeftShoulder = 11 => "left_shoulder",
    RightShoulder = 12 => "right_shoulder",
    LeftElbow = 13 => "left_elbow",
    RightElbow = 14 => "right_elbow",
    LeftWrist = 15 => "left_wrist",
    RightWrist = 16 => "right_wrist",
    LeftPinky = 17 => "left_pinky",
    RightPinky = 18 => "right_pinky",
    LeftIndex = 19 => "left_index",
    RightIndex = 20 => "right_index",
    LeftThumb = 21 => "left_thumb",
    RightThumb = 22 => "right_thumb",
    LeftHip = 23 => "left_hip",
    RightHip = 24 => "right_hip",
    LeftKnee = 25 => "left_knee",
    RightKnee = 26 => "right_knee",
    LeftAnkle = 27 => "left_ankle",
    RightAnkle = 28 => "right_ankle",
    LeftHeel = 29 => "left_heel",
    RightHeel = 30 => "right_heel",
    LeftFootIndex = 31 => "left_foot_index",
    RightFootIndex = 32 => "right_foot_index",
}

impl Landmark {
    /// Positional index in the 33-point vocabulary
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Landmark at a positional index
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl FromStr for Landmark {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|landmark| landmark.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::Error::InvalidInput(format!("Unknown landmark name: {s}")))
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-frame lookup from landmark to image position
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkMap {
    points: [Option<Point2>; NUM_BLAZEPOSE_LANDMARKS],
}

impl Default for LandmarkMap {
    fn default() -> Self {
        Self {
            points: [None; NUM_BLAZEPOSE_LANDMARKS],
        }
    }
}

impl LandmarkMap {
    /// Build the lookup for one frame.
    ///
    /// Named keypoints are placed first (a later duplicate name replaces an
    /// earlier one). Then every keypoint whose list position is a vocabulary
    /// index fills that landmark if no named keypoint claimed it. Names outside
    /// the vocabulary are ignored.
    #[must_use]
    pub fn from_keypoints(keypoints: &[Keypoint]) -> Self {
        let mut points = [None; NUM_BLAZEPOSE_LANDMARKS];

        for keypoint in keypoints {
            if let Some(landmark) = keypoint.name.as_deref().and_then(|name| name.parse::<Landmark>().ok()) {
                points[landmark.index()] = Some(keypoint.point());
            }
        }

        for (index, keypoint) in keypoints.iter().enumerate().take(NUM_BLAZEPOSE_LANDMARKS) {
            if points[index].is_none() {
                points[index] = Some(keypoint.point());
            }
        }

        Self { points }
    }

    /// Position of a landmark, or `None` when the frame does not provide it
    #[must_use]
    pub fn get(&self, landmark: Landmark) -> Option<Point2> {
        self.points[landmark.index()]
    }

    /// Number of landmarks resolved for this frame
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }

    /// True when no landmark could be resolved
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_indices_match_vocabulary() {
        assert_eq!(Landmark::LeftShoulder.index(), 11);
        assert_eq!(Landmark::RightShoulder.index(), 12);
        assert_eq!(Landmark::LeftWrist.index(), 15);
        assert_eq!(Landmark::LeftHip.index(), 23);
        assert_eq!(Landmark::RightHip.index(), 24);
        assert_eq!(Landmark::LeftKnee.index(), 25);
        assert_eq!(Landmark::LeftAnkle.index(), 27);
        for (i, landmark) in Landmark::ALL.iter().enumerate() {
            assert_eq!(landmark.index(), i);
            assert_eq!(Landmark::from_index(i), Some(*landmark));
        }
        assert_eq!(Landmark::from_index(33), None);
    }

    #[test]
    fn test_landmark_parse() {
        assert_eq!("left_wrist".parse::<Landmark>().unwrap(), Landmark::LeftWrist);
        assert_eq!("LEFT_WRIST".parse::<Landmark>().unwrap(), Landmark::LeftWrist);
        assert!("tail".parse::<Landmark>().is_err());
    }

    #[test]
    fn test_named_lookup() {
        let keypoints = vec![
            Keypoint::named(Landmark::LeftShoulder, 1.0, 2.0),
            Keypoint::named(Landmark::RightHip, 3.0, 4.0),
        ];
        let map = LandmarkMap::from_keypoints(&keypoints);
        assert_eq!(map.get(Landmark::LeftShoulder), Some(Point2::new(1.0, 2.0)));
        assert_eq!(map.get(Landmark::RightHip), Some(Point2::new(3.0, 4.0)));
        // Position 0 and 1 fill the gaps for nose and left_eye_inner
        assert_eq!(map.get(Landmark::Nose), Some(Point2::new(1.0, 2.0)));
        assert_eq!(map.get(Landmark::LeftWrist), None);
    }

    #[test]
    fn test_positional_fallback() {
        let keypoints: Vec<Keypoint> = (0..33).map(|i| Keypoint::new(f64::from(i), 0.0)).collect();
        let map = LandmarkMap::from_keypoints(&keypoints);
        assert_eq!(map.len(), 33);
        assert_eq!(map.get(Landmark::LeftAnkle), Some(Point2::new(27.0, 0.0)));
    }

    #[test]
    fn test_named_lookup_takes_precedence() {
        let mut keypoints: Vec<Keypoint> = (0..33).map(|i| Keypoint::new(f64::from(i), 0.0)).collect();
        keypoints[0] = Keypoint::named(Landmark::LeftWrist, 100.0, 200.0);
        let map = LandmarkMap::from_keypoints(&keypoints);
        assert_eq!(map.get(Landmark::LeftWrist), Some(Point2::new(100.0, 200.0)));
        // The renamed entry still backs its own position
        assert_eq!(map.get(Landmark::Nose), Some(Point2::new(100.0, 200.0)));
    }

    #[test]
    fn test_empty_frame() {
        let map = LandmarkMap::from_keypoints(&[]);
        assert!(map.is_empty());
        assert_eq!(map.get(Landmark::LeftShoulder), None);
        assert_eq!(map, LandmarkMap::default());
    }
}
