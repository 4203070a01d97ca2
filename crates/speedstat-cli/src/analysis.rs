//! Turns a speed sample and the user's choices into an [`AnalysisResult`].

use std::str::FromStr;

use speedstat_sample::SpeedSample;
use speedstat_stats::{
    StatsError, descriptive,
    outliers::{self, OutlierPartition},
    percentiles, threshold,
};

/// A whole-number percentile in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, serde::Serialize)]
#[serde(transparent)]
pub struct PercentileSpec(u8);

impl PercentileSpec {
    pub const EU_STANDARD: Self = Self(85);
    pub const US_STANDARD: Self = Self(90);

    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= 100 { Some(Self(value)) } else { None }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

/// A menu answer or percentile the user can correct by answering again.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SelectionError {
    #[display("Invalid option '{input}'. Please enter {expected}.")]
    InvalidOption {
        input: String,
        expected: &'static str,
    },
    #[display("'{input}' is not a whole-number percentile.")]
    InvalidPercentile { input: String },
    #[display("Percentile must be between 0 and 100, got {value}.")]
    PercentileOutOfRange { value: i64 },
}

impl FromStr for PercentileSpec {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let value = input
            .parse::<i64>()
            .map_err(|_| SelectionError::InvalidPercentile {
                input: input.to_owned(),
            })?;
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(SelectionError::PercentileOutOfRange { value })
    }
}

/// Whether outliers were stripped before computing the cleaned percentile.
#[derive(Debug, Clone, PartialEq)]
pub enum OutlierDecision {
    Kept,
    Removed(OutlierPartition),
}

impl OutlierDecision {
    /// Splits `sample` by Z-score and keeps the partition.
    pub fn remove(sample: &SpeedSample, z_threshold: f64) -> Result<Self, StatsError> {
        outliers::detect_outliers(sample.as_slice(), z_threshold).map(Self::Removed)
    }

    /// The values analysed "without outliers"; the full sample if nothing was removed.
    #[must_use]
    pub fn cleaned<'a>(&'a self, sample: &'a SpeedSample) -> &'a [f64] {
        match self {
            Self::Kept => sample.as_slice(),
            Self::Removed(partition) => &partition.cleaned,
        }
    }

    #[must_use]
    pub fn removed(&self) -> Option<&[f64]> {
        match self {
            Self::Kept => None,
            Self::Removed(partition) => Some(&partition.removed),
        }
    }
}

/// Read-only summary of one analysis, computed once per session.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AnalysisResult {
    pub percentile: PercentileSpec,
    pub mean: f64,
    pub std_dev: f64,
    pub percentile_with_outliers: f64,
    pub percentile_without_outliers: f64,
    pub above_threshold_count: usize,
    pub total_count: usize,
    /// `None` when outlier removal was not requested.
    pub removed_outliers: Option<Vec<f64>>,
}

impl AnalysisResult {
    /// The percentile speed is used directly as the suggested limit.
    #[must_use]
    pub fn recommended_limit_with_outliers(&self) -> f64 {
        self.percentile_with_outliers
    }

    #[must_use]
    pub fn recommended_limit_without_outliers(&self) -> f64 {
        self.percentile_without_outliers
    }
}

/// An [`AnalysisResult`] together with the speeds above the percentile threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub result: AnalysisResult,
    pub above_threshold: Vec<f64>,
}

/// Runs the statistics pipeline on the original and cleaned samples.
///
/// The threshold used for counting speeders is the percentile of the
/// original sample.
pub fn analyze(
    sample: &SpeedSample,
    outliers: &OutlierDecision,
    percentile: PercentileSpec,
) -> Result<Analysis, StatsError> {
    let speeds = sample.as_slice();
    let p = percentile.as_f64();

    let mean = descriptive::mean(speeds)?;
    let std_dev = descriptive::population_std_dev(speeds)?;
    let percentile_with_outliers = percentiles::percentile(speeds, p)?;
    let percentile_without_outliers = percentiles::percentile(outliers.cleaned(sample), p)?;
    let above_threshold = threshold::filter_above_threshold(speeds, percentile_with_outliers);

    let result = AnalysisResult {
        percentile,
        mean,
        std_dev,
        percentile_with_outliers,
        percentile_without_outliers,
        above_threshold_count: above_threshold.len(),
        total_count: speeds.len(),
        removed_outliers: outliers.removed().map(<[f64]>::to_vec),
    };
    tracing::debug!(percentile = percentile.value(), ?result, "analysis complete");

    Ok(Analysis {
        result,
        above_threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(values: &[f64]) -> SpeedSample {
        SpeedSample::new(values.to_vec()).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_percentile_spec_parsing() {
        assert_eq!("85".parse::<PercentileSpec>(), Ok(PercentileSpec::EU_STANDARD));
        assert_eq!(" 0 ".parse::<PercentileSpec>().unwrap().value(), 0);
        assert_eq!("100".parse::<PercentileSpec>().unwrap().value(), 100);
        assert_eq!(
            "101".parse::<PercentileSpec>(),
            Err(SelectionError::PercentileOutOfRange { value: 101 })
        );
        assert_eq!(
            "-5".parse::<PercentileSpec>(),
            Err(SelectionError::PercentileOutOfRange { value: -5 })
        );
        assert!(matches!(
            "85.5".parse::<PercentileSpec>(),
            Err(SelectionError::InvalidPercentile { .. })
        ));
    }

    #[test]
    fn test_analyze_without_removal() {
        let speeds = sample(&[60.0, 65.0, 70.0, 75.0, 80.0]);
        let analysis = analyze(&speeds, &OutlierDecision::Kept, PercentileSpec::EU_STANDARD).unwrap();
        let result = &analysis.result;

        assert_eq!(result.mean, 70.0);
        // rank = 4 * 0.85 = 3.4
        assert_close(result.percentile_with_outliers, 77.0);
        assert_eq!(
            result.percentile_with_outliers,
            result.percentile_without_outliers
        );
        assert_eq!(analysis.above_threshold, [80.0]);
        assert_eq!(result.above_threshold_count, 1);
        assert_eq!(result.total_count, 5);
        assert_eq!(result.removed_outliers, None);
    }

    #[test]
    fn test_analyze_with_removal() {
        let mut values = [60.0, 65.0, 70.0, 75.0].repeat(5);
        values.push(5000.0);
        let speeds = sample(&values);
        let outliers = OutlierDecision::remove(&speeds, 3.0).unwrap();
        let analysis = analyze(&speeds, &outliers, PercentileSpec::US_STANDARD).unwrap();
        let result = &analysis.result;

        assert_eq!(result.removed_outliers.as_deref(), Some(&[5000.0][..]));
        assert_eq!(result.total_count, 21);
        // 20 cleaned values; rank = 19 * 0.9 = 17.1 lands between two 75s
        assert_eq!(result.percentile_without_outliers, 75.0);
        // 21 values; rank = 20 * 0.9 = 18 is the 19th sorted value
        assert_eq!(result.percentile_with_outliers, 75.0);
        assert_eq!(analysis.above_threshold, [5000.0]);
        assert_eq!(
            result.recommended_limit_without_outliers(),
            result.percentile_without_outliers
        );
    }

    #[test]
    fn test_removal_with_zero_variance_keeps_everything() {
        let speeds = sample(&[5.0, 5.0, 5.0, 5.0]);
        let outliers = OutlierDecision::remove(&speeds, 3.0).unwrap();
        assert_eq!(outliers.cleaned(&speeds), &[5.0, 5.0, 5.0, 5.0]);
        assert_eq!(outliers.removed(), Some(&[][..]));
    }
}
