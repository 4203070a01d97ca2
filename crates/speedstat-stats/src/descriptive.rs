use crate::{StatsError, percentiles};

/// Computes the arithmetic mean of `values`.
///
/// # Errors
///
/// Returns [`StatsError::EmptySample`] if `values` is empty.
///
/// # Examples
///
/// ```
/// # use speedstat_stats::descriptive::mean;
/// assert_eq!(mean(&[60.0, 70.0, 80.0]).unwrap(), 70.0);
/// assert!(mean(&[]).is_err());
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptySample);
    }
    let scale = magnitude_scale(values);
    let scaled_sum = values.iter().map(|v| v / scale).sum::<f64>();
    Ok(scaled_sum / values.len() as f64 * scale)
}

/// Computes the population variance (divides by `n`, not `n - 1`).
///
/// The variance of values near `f64::MAX` can exceed the `f64` range, in
/// which case this returns infinity. [`population_std_dev`] stays finite.
pub fn population_variance(values: &[f64]) -> Result<f64, StatsError> {
    let moments = ScaledMoments::new(values)?;
    Ok(moments.variance * moments.scale * moments.scale)
}

/// Computes the population standard deviation.
///
/// # Examples
///
/// ```
/// # use speedstat_stats::descriptive::population_std_dev;
/// let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert_eq!(population_std_dev(&values).unwrap(), 2.0);
/// ```
pub fn population_std_dev(values: &[f64]) -> Result<f64, StatsError> {
    let moments = ScaledMoments::new(values)?;
    Ok(moments.variance.sqrt() * moments.scale)
}

/// Largest power of two not above the largest magnitude in `values`, or 1.
///
/// Dividing by a power of two is exact, so statistics computed on the scaled
/// values match the unscaled ones while sums and squares stay far from
/// overflow.
fn magnitude_scale(values: &[f64]) -> f64 {
    const EXPONENT_MASK: u64 = 0x7ff0_0000_0000_0000;
    let max_abs = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let scale = f64::from_bits(max_abs.to_bits() & EXPONENT_MASK);
    if scale.is_normal() { scale } else { 1.0 }
}

/// Mean and population variance of `values / scale`.
struct ScaledMoments {
    scale: f64,
    mean: f64,
    variance: f64,
}

impl ScaledMoments {
    #[expect(clippy::cast_precision_loss)]
    fn new(values: &[f64]) -> Result<Self, StatsError> {
        let mean = mean(values)?;
        let scale = magnitude_scale(values);
        let scaled_mean = mean / scale;
        let sum_sq = values
            .iter()
            .map(|v| (v / scale - scaled_mean).powi(2))
            .sum::<f64>();
        Ok(Self {
            scale,
            mean: scaled_mean,
            variance: sum_sq / values.len() as f64,
        })
    }
}

/// Descriptive statistics summarizing a speed sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean of the dataset.
    pub mean: f64,
    /// The 50th percentile, interpolated.
    pub median: f64,
    /// The population variance of the dataset.
    pub variance: f64,
    /// The population standard deviation of the dataset.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::EmptySample`] if `values` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use speedstat_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new(&[5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    pub fn new(values: &[f64]) -> Result<Self, StatsError> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted)
    }

    /// Like [`Self::new`], but skips sorting.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    pub fn from_sorted(sorted_values: &[f64]) -> Result<Self, StatsError> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let (Some(&min), Some(&max)) = (sorted_values.first(), sorted_values.last()) else {
            return Err(StatsError::EmptySample);
        };
        let moments = ScaledMoments::new(sorted_values)?;
        let median = percentiles::percentile_sorted(sorted_values, 50.0)?;

        Ok(Self {
            min,
            max,
            mean: moments.mean * moments.scale,
            median,
            variance: moments.variance * moments.scale * moments.scale,
            std_dev: moments.variance.sqrt() * moments.scale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_single_value() {
        assert_eq!(mean(&[42.5]).unwrap(), 42.5);
    }

    #[test]
    fn test_empty_sample_is_rejected() {
        assert_eq!(mean(&[]), Err(StatsError::EmptySample));
        assert_eq!(population_std_dev(&[]), Err(StatsError::EmptySample));
        assert_eq!(DescriptiveStats::new(&[]), Err(StatsError::EmptySample));
    }

    #[test]
    fn test_std_dev_is_population_not_sample() {
        // sample std dev would be sqrt(2) for this data
        let std_dev = population_std_dev(&[1.0, 3.0]).unwrap();
        assert_eq!(std_dev, 1.0);
    }

    #[test]
    fn test_zero_variance() {
        let stats = DescriptiveStats::new(&[5.0, 5.0, 5.0, 5.0]).unwrap();
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.median, 5.0);
    }

    #[test]
    fn test_extreme_magnitudes_do_not_overflow() {
        let values = [f64::MAX, f64::MAX, f64::MAX, f64::MAX];
        assert_eq!(mean(&values).unwrap(), f64::MAX);
        assert_eq!(population_std_dev(&values).unwrap(), 0.0);

        let values = [1e308, 1e308, 1e308, -1e308];
        let mean = mean(&values).unwrap();
        let std_dev = population_std_dev(&values).unwrap();
        assert!((mean / 5e307 - 1.0).abs() < 1e-12, "mean {mean}");
        // sqrt(3) * 5e307
        assert!((std_dev / (3.0_f64.sqrt() * 5e307) - 1.0).abs() < 1e-12, "std dev {std_dev}");
        assert!(population_variance(&values).unwrap().is_infinite());
    }

    #[test]
    fn test_scaling_keeps_ordinary_results_exact() {
        let values = [60.0, 70.0, 80.0];
        assert_eq!(mean(&values).unwrap(), 70.0);
        let stats = DescriptiveStats::new(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.variance, 4.0);
        assert_eq!(stats.std_dev, 2.0);
    }

    #[test]
    fn test_median_interpolates_even_length() {
        let stats = DescriptiveStats::new(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.median, 2.5);
    }
}
