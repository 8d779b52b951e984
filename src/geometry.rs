//! 2-D vector and angle helpers.
//!
//! All angles are returned in degrees. Screen coordinates are assumed, so the
//! upward direction is negative Y.

use crate::constants::NORM_EPSILON;
use serde::{Deserialize, Serialize};

/// Upward axis in screen coordinates
pub const UP: Point2 = Point2 { x: 0.0, y: -1.0 };

/// A point (or vector) in image space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate, growing downward
    pub y: f64,
}

impl Point2 {
    /// Create a new point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector pointing from `origin` to `self`
    #[must_use]
    pub fn sub(self, origin: Self) -> Self {
        Self::new(self.x - origin.x, self.y - origin.y)
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Euclidean length
    #[must_use]
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// True when both coordinates are finite
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Arithmetic mean of two points
#[must_use]
pub fn midpoint(a: Point2, b: Point2) -> Point2 {
    Point2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Angle between two vectors in degrees, in `[0, 180]`.
///
/// The norm product is padded with [`NORM_EPSILON`] so a zero-length vector
/// yields 90° instead of a division by zero. Such a result carries no meaning
/// and callers should treat it as unreliable.
#[must_use]
pub fn angle_between(v1: Point2, v2: Point2) -> f64 {
    let cos_angle = v1.dot(v2) / (v1.norm() * v2.norm() + NORM_EPSILON);
    let degrees = cos_angle.clamp(-1.0, 1.0).acos().to_degrees();
    // to_degrees can overshoot 180 by one ulp; NaN passes through
    if degrees > 180.0 {
        180.0
    } else {
        degrees
    }
}

/// Angle at `vertex` formed by the rays towards `p1` and `p3`, in degrees
#[must_use]
pub fn angle_at(p1: Point2, vertex: Point2, p3: Point2) -> f64 {
    angle_between(p1.sub(vertex), p3.sub(vertex))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_right_angle() {
        let angle = angle_at(Point2::new(1.0, 0.0), Point2::new(0.0, 0.0), Point2::new(0.0, 1.0));
        assert_abs_diff_eq!(angle, 90.0, epsilon = 1e-4);
    }

    #[test]
    fn test_opposite_rays_are_straight() {
        let angle = angle_at(Point2::new(-3.0, 2.0), Point2::new(0.0, 2.0), Point2::new(5.0, 2.0));
        assert_abs_diff_eq!(angle, 180.0, epsilon = 0.1);
    }

    #[test]
    fn test_same_direction_is_zero() {
        let angle = angle_at(Point2::new(2.0, 2.0), Point2::new(0.0, 0.0), Point2::new(4.0, 4.0));
        assert_abs_diff_eq!(angle, 0.0, epsilon = 0.1);
    }

    #[test]
    fn test_coincident_points_do_not_panic() {
        let vertex = Point2::new(10.0, 10.0);
        let angle = angle_at(vertex, vertex, Point2::new(20.0, 10.0));
        assert_abs_diff_eq!(angle, 90.0, epsilon = 1e-9);

        let angle = angle_at(vertex, vertex, vertex);
        assert!((0.0..=180.0).contains(&angle));
    }

    #[test]
    fn test_angle_to_vertical() {
        // Leaning 45 degrees to the right of straight up
        let angle = angle_between(Point2::new(1.0, -1.0), UP);
        assert_abs_diff_eq!(angle, 45.0, epsilon = 1e-3);
    }

    #[test]
    fn test_midpoint() {
        assert_eq!(midpoint(Point2::new(0.0, 2.0), Point2::new(4.0, 6.0)), Point2::new(2.0, 4.0));
    }

    proptest! {
        #[test]
        fn prop_angle_in_range(
            x1 in -1e4..1e4f64, y1 in -1e4..1e4f64,
            vx in -1e4..1e4f64, vy in -1e4..1e4f64,
            x3 in -1e4..1e4f64, y3 in -1e4..1e4f64,
        ) {
            let angle = angle_at(Point2::new(x1, y1), Point2::new(vx, vy), Point2::new(x3, y3));
            prop_assert!((0.0..=180.0).contains(&angle));
        }
    }
}
