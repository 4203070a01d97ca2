//! Statistical core for vehicle speed analysis.
//!
//! Every function in this crate is pure: it reads only its arguments and
//! returns freshly allocated results. The crate provides:
//!
//! - **Descriptive statistics**: mean, population standard deviation and a summary struct
//! - **Percentiles**: linear interpolation between sorted order statistics
//! - **Outlier detection**: Z-score partitioning into cleaned and removed values
//! - **Threshold filtering**: the sub-sequence of values strictly above a threshold
//! - **Histogram binning**: fixed-width bins shared between several series
//!
//! # Modules
//!
//! - [`descriptive`]: Mean, standard deviation and [`DescriptiveStats`](descriptive::DescriptiveStats)
//! - [`percentiles`]: Percentile computation
//! - [`outliers`]: Z-score outlier detection
//! - [`threshold`]: Threshold filtering
//! - [`histogram`]: Histogram construction over shared bin edges
//!
//! # Examples
//!
//! ## Computing a percentile
//!
//! ```
//! use speedstat_stats::percentiles::percentile;
//!
//! let speeds = [60.0, 65.0, 70.0, 75.0, 80.0];
//! assert_eq!(percentile(&speeds, 50.0).unwrap(), 70.0);
//! assert_eq!(percentile(&speeds, 90.0).unwrap(), 78.0);
//! ```
//!
//! ## Removing outliers
//!
//! ```
//! use speedstat_stats::outliers::detect_outliers;
//!
//! let mut speeds = vec![70.0; 19];
//! speeds.push(200.0);
//! let partition = detect_outliers(&speeds, 3.0).unwrap();
//! assert_eq!(partition.removed, [200.0]);
//! assert_eq!(partition.cleaned.len(), 19);
//! ```
//!
//! ## Filtering above a threshold
//!
//! ```
//! use speedstat_stats::threshold::filter_above_threshold;
//!
//! let speeds = [60.0, 80.0, 70.0, 90.0];
//! assert_eq!(filter_above_threshold(&speeds, 70.0), [80.0, 90.0]);
//! ```

pub mod descriptive;
pub mod histogram;
pub mod outliers;
pub mod percentiles;
pub mod threshold;

/// Invalid input to one of the statistical functions.
///
/// These are contract violations on the caller's side and are reported
/// rather than silently recovered from.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum StatsError {
    #[display("statistic is undefined for an empty sample")]
    EmptySample,
    #[display("percentile must be within [0, 100], got {percentile}")]
    PercentileOutOfRange { percentile: f64 },
    #[display("z-score threshold must be positive, got {threshold}")]
    InvalidZThreshold { threshold: f64 },
    #[display("histogram requires at least one bin")]
    ZeroBins,
}
