//! Constants used throughout the library

/// Number of landmarks in the BlazePose landmark vocabulary
pub const NUM_BLAZEPOSE_LANDMARKS: usize = 33;

/// Default frames per second assumption when a frame carries no video time
pub const DEFAULT_FPS: f64 = 30.0;

/// Guard added to vector-norm products before dividing
pub const NORM_EPSILON: f64 = 1e-6;

/// Number of decimals kept on computed angles
pub const ANGLE_DECIMALS: i32 = 2;

/// Threshold algorithm: spine below this is a top
pub const TOP_SPINE_MAX: f64 = 25.0;

/// Threshold algorithm: spine above this is a bottom
pub const BOTTOM_SPINE_MIN: f64 = 60.0;

/// Threshold algorithm: spine below this (and not a top) is a release
pub const RELEASE_SPINE_MAX: f64 = 45.0;

/// Threshold algorithm: degrees past `BOTTOM_SPINE_MIN` at which bottom confidence saturates
pub const BOTTOM_CONFIDENCE_SPAN: f64 = 30.0;

/// Confidence assigned to a phase inferred from a local peak
pub const PEAK_CONFIDENCE: f64 = 0.9;

/// Confidence assigned to connect/release transitions
pub const TRANSITION_CONFIDENCE: f64 = 0.5;

/// Peak algorithm: a spine peak must exceed this to count as a bottom
pub const SPINE_PEAK_MIN: f64 = 50.0;

/// Peak algorithm: frames that must pass before the same label is emitted again
pub const REFRACTORY_FRAMES: u64 = 10;

/// Peak algorithm: spine change per frame (degrees) that counts as a transition
pub const SLOPE_THRESHOLD: f64 = 2.0;

/// Peak algorithm: samples kept per history series
pub const HISTORY_LEN: usize = 10;

/// Evaluation: frames either side of an annotation that still count as a match
pub const DEFAULT_TOLERANCE_FRAMES: u64 = 2;

/// Candidate generation: moving-average window applied before peak search
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// Candidate generation: minimum spacing between candidate peaks
pub const DEFAULT_CANDIDATE_MIN_DISTANCE: usize = 15;

/// Candidate generation: a top candidate needs the spine below this
pub const CANDIDATE_TOP_MAX_SPINE: f64 = 30.0;

/// Candidate generation: a top candidate needs wrists no further below the shoulders than this
pub const CANDIDATE_TOP_MIN_ARM_HEIGHT: f64 = -80.0;

/// Candidate generation: spine peaks below this are not bottom candidates
pub const CANDIDATE_BOTTOM_MIN_SPINE: f64 = 50.0;
