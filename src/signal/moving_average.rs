/// Centered moving average.
///
/// Each output is the mean of the samples within `window / 2` on either side.
/// The window is truncated at the ends of the series rather than padded, so
/// edge values average fewer samples. Output length always equals input
/// length; a `window` of 0 or 1 returns the input unchanged.
#[must_use]
pub fn smooth(values: &[f64], window: usize) -> Vec<f64> {
    let half = window / 2;
    (0..values.len())
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(values.len());
            let slice = &values[start..end];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}
