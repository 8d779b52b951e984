use super::{Classification, DetectionParams, Position};

/// Classify a frame from its spine angle alone.
///
/// - below `top_spine_max`: top, confidence falls linearly from 1 at 0°
/// - above `bottom_spine_min`: bottom, confidence ramps up over `bottom_confidence_span`
/// - below `release_spine_max`: release
/// - anything else, including both boundaries: connect
#[must_use]
pub fn classify(params: &DetectionParams, spine: f64) -> Classification {
    if spine < params.top_spine_max {
        Classification::labelled(Position::Top, 1.0 - spine / params.top_spine_max)
    } else if spine > params.bottom_spine_min {
        let confidence = ((spine - params.bottom_spine_min) / params.bottom_confidence_span).min(1.0);
        Classification::labelled(Position::Bottom, confidence)
    } else if spine < params.release_spine_max {
        Classification::labelled(Position::Release, params.transition_confidence)
    } else {
        Classification::labelled(Position::Connect, params.transition_confidence)
    }
}
