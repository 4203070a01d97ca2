use crate::StatsError;

/// Computes the `percentile`-th percentile of unsorted `values`.
///
/// The values are sorted internally; see [`percentile_sorted`] for the
/// interpolation rule.
///
/// # Errors
///
/// Returns [`StatsError::EmptySample`] if `values` is empty and
/// [`StatsError::PercentileOutOfRange`] if `percentile` is not in `[0, 100]`.
///
/// # Examples
///
/// ```
/// use speedstat_stats::percentiles::percentile;
///
/// let speeds = [75.0, 60.0, 70.0, 65.0];
/// assert_eq!(percentile(&speeds, 0.0).unwrap(), 60.0);
/// assert_eq!(percentile(&speeds, 100.0).unwrap(), 75.0);
/// assert_eq!(percentile(&speeds, 50.0).unwrap(), 67.5);
/// ```
pub fn percentile(values: &[f64], percentile: f64) -> Result<f64, StatsError> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_sorted(&sorted, percentile)
}

/// Computes a percentile from sorted data using linear interpolation.
///
/// For `n` sorted values the percentile `p` sits at fractional rank
/// `h = (n - 1) * p / 100`. The result is interpolated between the values at
/// `floor(h)` and `ceil(h)`, so the 0th percentile is the minimum and the
/// 100th percentile is the maximum.
///
/// # Panics
///
/// Panics if `sorted_values` is not sorted in ascending order.
///
/// # Examples
///
/// ```
/// use speedstat_stats::percentiles::percentile_sorted;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(percentile_sorted(&values, 25.0).unwrap(), 2.0);
/// assert_eq!(percentile_sorted(&values, 50.0).unwrap(), 3.0);
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn percentile_sorted(sorted_values: &[f64], percentile: f64) -> Result<f64, StatsError> {
    assert!(
        sorted_values.is_sorted_by(|a, b| a <= b),
        "values must be sorted in ascending order"
    );

    if sorted_values.is_empty() {
        return Err(StatsError::EmptySample);
    }
    if !(0.0..=100.0).contains(&percentile) {
        return Err(StatsError::PercentileOutOfRange { percentile });
    }

    let last = sorted_values.len() - 1;
    let rank = last as f64 * percentile / 100.0;
    let lower_idx = (rank.floor() as usize).min(last);
    let upper_idx = (rank.ceil() as usize).min(last);
    let lower = sorted_values[lower_idx];
    let upper = sorted_values[upper_idx];
    if lower_idx == upper_idx {
        return Ok(lower);
    }

    let fraction = rank - rank.floor();
    let gap = upper - lower;
    let interpolated = if gap.is_finite() {
        lower + gap * fraction
    } else {
        // the gap between values of opposite sign near f64::MAX overflows
        lower * (1.0 - fraction) + upper * fraction
    };
    // Rounding in the interpolation must not leave the [lower, upper] bracket,
    // otherwise monotonicity across adjacent ranks breaks.
    Ok(interpolated.min(upper).max(lower))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_interpolates_between_order_statistics() {
        let values = [10.0, 20.0, 30.0, 40.0];
        // rank = 3 * 0.85 = 2.55
        assert_close(percentile(&values, 85.0).unwrap(), 35.5);
        // rank = 3 * 0.90 = 2.7
        assert_close(percentile(&values, 90.0).unwrap(), 37.0);
    }

    #[test]
    fn test_single_value() {
        for p in [0.0, 37.5, 85.0, 100.0] {
            assert_eq!(percentile(&[64.0], p).unwrap(), 64.0);
        }
    }

    #[test]
    fn test_unsorted_input() {
        let values = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(percentile(&values, 75.0).unwrap(), 4.0);
    }

    #[test]
    fn test_empty_sample() {
        assert_eq!(percentile(&[], 50.0), Err(StatsError::EmptySample));
    }

    #[test]
    fn test_out_of_range_percentile() {
        let values = [1.0, 2.0];
        assert_eq!(
            percentile(&values, 100.5),
            Err(StatsError::PercentileOutOfRange { percentile: 100.5 })
        );
        assert!(matches!(
            percentile(&values, -1.0),
            Err(StatsError::PercentileOutOfRange { .. })
        ));
        assert!(percentile(&values, f64::NAN).is_err());
    }

    #[test]
    fn test_interpolates_across_full_f64_range() {
        assert_eq!(percentile(&[-1e308, 1e308], 50.0).unwrap(), 0.0);
        assert_eq!(percentile(&[-f64::MAX, f64::MAX], 50.0).unwrap(), 0.0);
        assert_close(percentile(&[-1e308, 1e308], 75.0).unwrap() / 1e308, 0.5);
    }

    #[test]
    #[should_panic(expected = "values must be sorted")]
    fn test_sorted_variant_rejects_unsorted() {
        let _ = percentile_sorted(&[3.0, 1.0], 50.0);
    }

    proptest! {
        #[test]
        fn prop_bounds_are_min_and_max(
            values in prop::collection::vec(-1.0e6..1.0e6f64, 1..200),
        ) {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(percentile(&values, 0.0).unwrap(), min);
            prop_assert_eq!(percentile(&values, 100.0).unwrap(), max);
        }

        #[test]
        fn prop_monotonic_in_percentile(
            values in prop::collection::vec(-1.0e6..1.0e6f64, 1..200),
        ) {
            let mut previous = f64::NEG_INFINITY;
            for p in 0..=100 {
                let value = percentile(&values, f64::from(p)).unwrap();
                prop_assert!(value >= previous, "p={} gave {} < {}", p, value, previous);
                previous = value;
            }
        }
    }
}
