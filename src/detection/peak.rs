use super::state::{trailing_peak, DetectorState, Sample};
use super::{Classification, DetectionParams, Position};
use crate::angles::AngleProfile;
use log::debug;

/// Classify a frame from local maxima in wrist height and spine angle.
///
/// A peak is confirmed one frame late: the window `(prev2, prev1, curr)`
/// flags `prev1`. An arm peak labels a top and a spine peak above
/// `spine_peak_min` labels a bottom, each only once per refractory gap;
/// when both fire on the same frame the bottom wins. Peak flags are reported
/// even when the gap suppresses the label. Without a label, a spine change of
/// more than `slope_threshold` since the previous frame yields connect
/// (bending down) or release (coming up).
#[must_use]
pub fn classify(
    params: &DetectionParams,
    state: &DetectorState,
    frame_index: u64,
    profile: &AngleProfile,
) -> (DetectorState, Classification) {
    let sample = Sample {
        arm_height: profile.arm_height(),
        spine: profile.spine,
    };
    let mut next = state.clone().with_sample(sample, params.history_len);
    let mut classification = Classification::default();

    if trailing_peak(next.arm_history()).is_some() {
        classification.is_arm_peak = true;
        if gate_open(next.last_top_frame(), frame_index, params.refractory_frames) {
            classification.position = Some(Position::Top);
            classification.confidence = params.peak_confidence;
            next = next.with_last_top(frame_index);
        } else {
            debug!("Frame {frame_index}: arm peak within refractory gap, top suppressed");
        }
    }

    if let Some(spine_peak) = trailing_peak(next.spine_history()).filter(|&v| v > params.spine_peak_min) {
        classification.is_spine_peak = true;
        if gate_open(next.last_bottom_frame(), frame_index, params.refractory_frames) {
            debug!("Frame {frame_index}: spine peak at {spine_peak:.1}°");
            classification.position = Some(Position::Bottom);
            classification.confidence = params.peak_confidence;
            next = next.with_last_bottom(frame_index);
        } else {
            debug!("Frame {frame_index}: spine peak within refractory gap, bottom suppressed");
        }
    }

    if classification.position.is_none() {
        if let Some(previous) = state.previous() {
            if sample.spine > previous.spine + params.slope_threshold {
                classification.position = Some(Position::Connect);
                classification.confidence = params.transition_confidence;
            } else if sample.spine < previous.spine - params.slope_threshold {
                classification.position = Some(Position::Release);
                classification.confidence = params.transition_confidence;
            }
        }
    }

    (next.with_previous(sample), classification)
}

fn gate_open(last_accepted: Option<u64>, frame_index: u64, refractory_frames: u64) -> bool {
    last_accepted.map_or(true, |last| frame_index.saturating_sub(last) > refractory_frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angles::WristHeights;

    fn profile(arm_height: f64, spine: f64) -> AngleProfile {
        AngleProfile {
            spine,
            wrist_heights: Some(WristHeights {
                left_wrist_height: arm_height,
                right_wrist_height: arm_height,
                avg_wrist_height: arm_height,
            }),
            ..AngleProfile::default()
        }
    }

    fn run(samples: &[(f64, f64)]) -> Vec<Classification> {
        let params = DetectionParams::default();
        let mut state = DetectorState::default();
        samples
            .iter()
            .enumerate()
            .map(|(i, &(arm, spine))| {
                let (next, c) = classify(&params, &state, i as u64, &profile(arm, spine));
                state = next;
                c
            })
            .collect()
    }

    #[test]
    fn test_arm_peak_labels_top_on_following_frame() {
        let out = run(&[(0.0, 70.0), (5.0, 70.0), (10.0, 70.0), (5.0, 70.0), (0.0, 70.0)]);
        assert!(out.iter().enumerate().all(|(i, c)| c.is_arm_peak == (i == 3)));
        assert_eq!(out[3].position, Some(Position::Top));
        assert_eq!(out[3].confidence, 0.9);
        assert!(out.iter().all(|c| !c.is_spine_peak));
    }

    #[test]
    fn test_refractory_gap_suppresses_label_not_flag() {
        let bump = [0.0, 5.0, 10.0, 5.0, 0.0];
        let samples: Vec<(f64, f64)> = bump.iter().chain(bump.iter()).map(|&a| (a, 70.0)).collect();
        let out = run(&samples);
        assert_eq!(out[3].position, Some(Position::Top));
        assert!(out[8].is_arm_peak);
        assert_eq!(out[8].position, None);
    }

    #[test]
    fn test_top_allowed_after_gap() {
        // Peaks confirmed at frames 3 and 14: 11 frames apart
        let mut arm = vec![0.0, 5.0, 10.0, 5.0];
        arm.extend(std::iter::repeat(0.0).take(9));
        arm.extend([10.0, 5.0]);
        let samples: Vec<(f64, f64)> = arm.into_iter().map(|a| (a, 70.0)).collect();
        let out = run(&samples);
        assert_eq!(out[3].position, Some(Position::Top));
        assert!(out[14].is_arm_peak);
        assert_eq!(out[14].position, Some(Position::Top));
    }

    #[test]
    fn test_exactly_refractory_gap_is_suppressed() {
        // Peaks confirmed at frames 3 and 13: exactly 10 apart
        let mut arm = vec![0.0, 5.0, 10.0, 5.0];
        arm.extend(std::iter::repeat(0.0).take(8));
        arm.extend([10.0, 5.0]);
        let samples: Vec<(f64, f64)> = arm.into_iter().map(|a| (a, 70.0)).collect();
        let out = run(&samples);
        assert!(out[13].is_arm_peak);
        assert_eq!(out[13].position, None);
    }

    #[test]
    fn test_spine_peak_labels_bottom() {
        let out = run(&[(0.0, 50.0), (0.0, 60.0), (0.0, 70.0), (0.0, 69.0), (0.0, 60.0)]);
        assert!(out[3].is_spine_peak);
        assert_eq!(out[3].position, Some(Position::Bottom));
        assert_eq!(out[3].confidence, 0.9);
    }

    #[test]
    fn test_low_spine_peak_ignored() {
        let out = run(&[(0.0, 30.0), (0.0, 40.0), (0.0, 45.0), (0.0, 44.0)]);
        assert!(!out[3].is_spine_peak);
        assert_eq!(out[3].position, None);
    }

    #[test]
    fn test_bottom_overrides_top_on_same_frame() {
        let out = run(&[(0.0, 50.0), (10.0, 70.0), (0.0, 60.0)]);
        assert!(out[2].is_arm_peak);
        assert!(out[2].is_spine_peak);
        assert_eq!(out[2].position, Some(Position::Bottom));
    }

    #[test]
    fn test_slope_fallback() {
        let out = run(&[(0.0, 40.0), (0.0, 43.0), (0.0, 43.0), (0.0, 41.5), (0.0, 38.0)]);
        assert_eq!(out[0].position, None);
        assert_eq!(out[1].position, Some(Position::Connect));
        assert_eq!(out[1].confidence, 0.5);
        assert_eq!(out[2].position, None);
        assert_eq!(out[3].position, None);
        assert_eq!(out[4].position, Some(Position::Release));
    }
}
