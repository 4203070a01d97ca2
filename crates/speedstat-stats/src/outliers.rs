//! Z-score based outlier detection.
//!
//! A value `x` is an outlier when `|x - μ| / σ >= threshold`, where `μ` is the
//! sample mean and `σ` the population standard deviation. A sample with zero
//! variance has no outliers.

use crate::{StatsError, descriptive};

/// Z-score threshold applied when the caller has no preference.
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// A sample split into values kept and values flagged as outliers.
///
/// `cleaned` and `removed` together hold exactly the elements of the original
/// sample, each in its original relative order.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierPartition {
    /// Values whose absolute Z-score is below the threshold.
    pub cleaned: Vec<f64>,
    /// Values whose absolute Z-score meets or exceeds the threshold.
    pub removed: Vec<f64>,
}

impl OutlierPartition {
    /// Returns `true` if at least one value was flagged.
    #[must_use]
    pub fn has_outliers(&self) -> bool {
        !self.removed.is_empty()
    }

    /// Total number of values across both partitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cleaned.len() + self.removed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partitions `values` into cleaned values and outliers by absolute Z-score.
///
/// # Errors
///
/// Returns [`StatsError::InvalidZThreshold`] if `z_threshold` is not a
/// positive number and [`StatsError::EmptySample`] if `values` is empty.
///
/// # Examples
///
/// ```
/// use speedstat_stats::outliers::detect_outliers;
///
/// // zero variance: nothing is an outlier
/// let partition = detect_outliers(&[5.0, 5.0, 5.0, 5.0], 3.0).unwrap();
/// assert_eq!(partition.cleaned, [5.0, 5.0, 5.0, 5.0]);
/// assert!(partition.removed.is_empty());
/// ```
pub fn detect_outliers(values: &[f64], z_threshold: f64) -> Result<OutlierPartition, StatsError> {
    if z_threshold.is_nan() || z_threshold <= 0.0 {
        return Err(StatsError::InvalidZThreshold {
            threshold: z_threshold,
        });
    }
    let mean = descriptive::mean(values)?;
    let std_dev = descriptive::population_std_dev(values)?;

    if std_dev == 0.0 {
        return Ok(OutlierPartition {
            cleaned: values.to_vec(),
            removed: vec![],
        });
    }

    let (removed, cleaned) = values
        .iter()
        .copied()
        .partition(|&x| z_score(x, mean, std_dev).abs() >= z_threshold);
    Ok(OutlierPartition { cleaned, removed })
}

fn z_score(x: f64, mean: f64, std_dev: f64) -> f64 {
    let deviation = x - mean;
    if deviation.is_finite() {
        deviation / std_dev
    } else {
        // |x - mean| can exceed f64::MAX even though the Z-score itself is small
        x / std_dev - mean / std_dev
    }
}
