//! Batch signal utilities for per-frame angle series.
//!
//! These operate on a complete, pre-computed series (one value per frame)
//! and are used for candidate generation rather than streaming detection.

/// Local extremum detection with minimum spacing
pub mod peaks;

/// Centered moving-average smoothing
pub mod moving_average;

pub use moving_average::smooth;
pub use peaks::{find_peaks, find_valleys};
