/// Returns the values strictly greater than `threshold`, in their original order.
///
/// # Examples
///
/// ```
/// use speedstat_stats::threshold::filter_above_threshold;
///
/// let speeds = [72.0, 88.5, 64.0, 91.0, 80.0];
/// assert_eq!(filter_above_threshold(&speeds, 80.0), [88.5, 91.0]);
/// ```
#[must_use]
pub fn filter_above_threshold(values: &[f64], threshold: f64) -> Vec<f64> {
    values.iter().copied().filter(|&v| v > threshold).collect()
}

/// Counts the values strictly greater than `threshold`.
#[must_use]
pub fn count_above_threshold(values: &[f64], threshold: f64) -> usize {
    values.iter().filter(|&&v| v > threshold).count()
}
