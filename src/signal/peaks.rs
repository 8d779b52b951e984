/// Indices of local maxima in `values`, scanned left to right.
///
/// Index `i` (excluding the two ends) is a candidate when
/// `values[i] > values[i - 1]` and `values[i] >= values[i + 1]`, so the first
/// sample of a rising plateau wins. Candidates below `threshold` are skipped.
/// A candidate is accepted only when it lies at least `min_distance` past the
/// previously accepted peak; rejected candidates do not move that reference.
#[must_use]
pub fn find_peaks(values: &[f64], min_distance: usize, threshold: Option<f64>) -> Vec<usize> {
    if values.len() < 3 {
        return Vec::new();
    }

    let mut peaks = Vec::new();
    let mut last_peak: Option<usize> = None;

    for i in 1..values.len() - 1 {
        if !(values[i] > values[i - 1] && values[i] >= values[i + 1]) {
            continue;
        }
        if threshold.is_some_and(|t| values[i] < t) {
            continue;
        }
        if last_peak.map_or(true, |last| i - last >= min_distance) {
            peaks.push(i);
            last_peak = Some(i);
        }
    }

    peaks
}

/// Indices of local minima, i.e. [`find_peaks`] on the negated series.
///
/// `threshold` is an upper bound here: valleys above it are skipped.
#[must_use]
pub fn find_valleys(values: &[f64], min_distance: usize, threshold: Option<f64>) -> Vec<usize> {
    let inverted: Vec<f64> = values.iter().map(|v| -v).collect();
    find_peaks(&inverted, min_distance, threshold.map(|t| -t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_short_series_have_no_peaks() {
        assert!(find_peaks(&[], 1, None).is_empty());
        assert!(find_peaks(&[1.0], 1, None).is_empty());
        assert!(find_peaks(&[1.0, 2.0], 1, None).is_empty());
    }

    #[test]
    fn test_single_peak() {
        assert_eq!(find_peaks(&[0.0, 5.0, 10.0, 5.0, 0.0], 1, None), vec![2]);
    }

    #[test]
    fn test_plateau_first_index_wins() {
        // Ties on the right count, ties on the left do not
        assert_eq!(find_peaks(&[0.0, 3.0, 3.0, 3.0, 0.0], 1, None), vec![1]);
    }

    #[test]
    fn test_min_distance_measured_from_accepted_peak() {
        let values = [0.0, 5.0, 0.0, 6.0, 0.0, 7.0, 0.0];
        // Peaks at 1, 3, 5. With spacing 4, 3 is rejected but 5 is exactly 4 past 1.
        assert_eq!(find_peaks(&values, 4, None), vec![1, 5]);
        assert_eq!(find_peaks(&values, 2, None), vec![1, 3, 5]);
    }

    #[test]
    fn test_threshold_skips_small_peaks() {
        let values = [0.0, 5.0, 0.0, 60.0, 0.0];
        assert_eq!(find_peaks(&values, 1, Some(50.0)), vec![3]);
    }

    #[test]
    fn test_skipped_candidate_does_not_block_later_peak() {
        // The low peak at 1 is below threshold, so the peak at 3 is the first accepted
        let values = [0.0, 5.0, 0.0, 60.0, 0.0];
        assert_eq!(find_peaks(&values, 10, Some(50.0)), vec![3]);
    }

    #[test]
    fn test_valleys() {
        let values = [10.0, 2.0, 10.0, 8.0, 10.0];
        assert_eq!(find_valleys(&values, 1, None), vec![1, 3]);
        assert_eq!(find_valleys(&values, 1, Some(5.0)), vec![1]);
    }

    proptest! {
        #[test]
        fn prop_peaks_respect_min_distance(
            values in prop::collection::vec(-100.0..100.0f64, 0..300),
            min_distance in 1usize..20,
        ) {
            let peaks = find_peaks(&values, min_distance, None);
            for pair in peaks.windows(2) {
                prop_assert!(pair[1] - pair[0] >= min_distance);
            }
        }
    }
}
