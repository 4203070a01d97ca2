use std::ops::Range;

use crate::StatsError;

/// Equal-width bin boundaries shared by every series drawn on one chart.
///
/// `num_bins` bins cover `[start, end]`. Each bin is half-open `[lo, hi)`,
/// except the last one which also includes `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct BinEdges {
    start: f64,
    end: f64,
    num_bins: usize,
}

/// A histogram representation of a dataset's distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// One entry per bin, in ascending order.
    pub bins: Vec<HistogramBin>,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    /// The range of values covered by this bin.
    pub range: Range<f64>,
    /// The number of values that fall within this bin.
    pub count: u64,
}

impl BinEdges {
    /// Creates `num_bins` equal-width bins between `min` and `max`.
    ///
    /// If the range is empty (`min == max`) it is widened by 0.5 on each side
    /// so that the single value lands in a bin of non-zero width.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::ZeroBins`] if `num_bins` is zero.
    ///
    /// # Panics
    ///
    /// Panics if `min > max` or either bound is not finite.
    pub fn linear(min: f64, max: f64, num_bins: usize) -> Result<Self, StatsError> {
        assert!(
            min.is_finite() && max.is_finite() && min <= max,
            "invalid histogram range {min}..={max}"
        );
        if num_bins == 0 {
            return Err(StatsError::ZeroBins);
        }
        let (start, end) = if max - min < f64::EPSILON {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };
        Ok(Self {
            start,
            end,
            num_bins,
        })
    }

    /// Creates `num_bins` equal-width bins spanning the minimum and maximum of `values`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::EmptySample`] if `values` is empty and
    /// [`StatsError::ZeroBins`] if `num_bins` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use speedstat_stats::histogram::BinEdges;
    ///
    /// let edges = BinEdges::spanning(&[60.0, 70.0, 80.0], 4).unwrap();
    /// assert_eq!(edges.edges().collect::<Vec<_>>(), [60.0, 65.0, 70.0, 75.0, 80.0]);
    /// ```
    pub fn spanning(values: &[f64], num_bins: usize) -> Result<Self, StatsError> {
        if values.is_empty() {
            return Err(StatsError::EmptySample);
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self::linear(min, max, num_bins)
    }

    #[must_use]
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Width of every bin.
    ///
    /// Infinite when `end - start` exceeds the `f64` range.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn bin_width(&self) -> f64 {
        (self.end - self.start) / self.num_bins as f64
    }

    /// Returns the `num_bins + 1` boundaries, from `start` to `end`.
    pub fn edges(&self) -> impl Iterator<Item = f64> + '_ {
        (0..=self.num_bins).map(|idx| self.edge(idx))
    }

    #[expect(clippy::cast_precision_loss)]
    fn edge(&self, idx: usize) -> f64 {
        if idx == self.num_bins {
            return self.end;
        }
        // Recompute from the range each time to avoid floating-point accumulation errors
        let span = self.end - self.start;
        if span.is_finite() {
            self.start + span * idx as f64 / self.num_bins as f64
        } else {
            let t = idx as f64 / self.num_bins as f64;
            self.start * (1.0 - t) + self.end * t
        }
    }

    /// Returns the index of the bin containing `value`, or `None` if it lies outside.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        if !(self.start..=self.end).contains(&value) {
            return None;
        }
        let width = self.bin_width();
        let position = if width.is_finite() {
            (value - self.start) / width
        } else {
            // halving is exact and keeps both differences in range
            (value / 2.0 - self.start / 2.0) / (self.end / 2.0 - self.start / 2.0)
                * self.num_bins as f64
        };
        let position = position.floor() as usize;
        Some(position.min(self.num_bins - 1))
    }

    /// Counts `values` into these bins. Values outside `[start, end]` are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use speedstat_stats::histogram::BinEdges;
    ///
    /// let speeds = [60.0, 61.0, 70.0, 79.0, 80.0];
    /// let edges = BinEdges::spanning(&speeds, 2).unwrap();
    /// let histogram = edges.histogram(speeds);
    /// let counts = histogram.bins.iter().map(|bin| bin.count).collect::<Vec<_>>();
    /// assert_eq!(counts, [2, 3]);
    /// ```
    pub fn histogram<I>(&self, values: I) -> Histogram
    where
        I: IntoIterator<Item = f64>,
    {
        let mut bins = (0..self.num_bins)
            .map(|idx| HistogramBin {
                range: self.edge(idx)..self.edge(idx + 1),
                count: 0,
            })
            .collect::<Vec<_>>();
        for value in values {
            if let Some(idx) = self.bin_index(value) {
                bins[idx].count += 1;
            }
        }
        Histogram { bins }
    }
}

impl Histogram {
    /// The largest bin count, or zero for an empty histogram.
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }

    /// Sum of all bin counts.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maximum_lands_in_last_bin() {
        let edges = BinEdges::linear(0.0, 30.0, 30).unwrap();
        assert_eq!(edges.bin_index(30.0), Some(29));
        assert_eq!(edges.bin_index(0.0), Some(0));
        assert_eq!(edges.bin_index(29.5), Some(29));
        assert_eq!(edges.bin_index(1.0), Some(1));
    }

    #[test]
    fn test_out_of_range_values_are_skipped() {
        let edges = BinEdges::linear(10.0, 20.0, 5).unwrap();
        assert_eq!(edges.bin_index(9.99), None);
        assert_eq!(edges.bin_index(20.01), None);
        assert_eq!(edges.bin_index(f64::NAN), None);
        let histogram = edges.histogram([5.0, 15.0, 25.0]);
        assert_eq!(histogram.total_count(), 1);
    }

    #[test]
    fn test_every_value_is_counted_once() {
        let speeds = (0..1000).map(|i| 50.0 + f64::from(i) * 0.037).collect::<Vec<_>>();
        let edges = BinEdges::spanning(&speeds, 30).unwrap();
        let histogram = edges.histogram(speeds.iter().copied());
        assert_eq!(histogram.bins.len(), 30);
        assert_eq!(histogram.total_count(), 1000);
    }

    #[test]
    fn test_edges_are_contiguous() {
        let edges = BinEdges::linear(55.3, 98.7, 30).unwrap();
        let histogram = edges.histogram(std::iter::empty());
        for pair in histogram.bins.windows(2) {
            assert_eq!(pair[0].range.end, pair[1].range.start);
        }
        assert_eq!(histogram.bins[0].range.start, 55.3);
        assert_eq!(histogram.bins[29].range.end, 98.7);
    }

    #[test]
    fn test_single_value_range_is_widened() {
        let edges = BinEdges::spanning(&[70.0, 70.0], 30).unwrap();
        assert_eq!(edges.start(), 69.5);
        assert_eq!(edges.end(), 70.5);
        let histogram = edges.histogram([70.0, 70.0]);
        assert_eq!(histogram.max_count(), 2);
    }

    #[test]
    fn test_shared_edges_for_subset() {
        let speeds = [60.0, 65.0, 70.0, 75.0, 80.0, 85.0];
        let edges = BinEdges::spanning(&speeds, 5).unwrap();
        let full = edges.histogram(speeds);
        let above = edges.histogram(speeds.into_iter().filter(|&v| v > 75.0));
        for (all, subset) in full.bins.iter().zip(&above.bins) {
            assert_eq!(all.range, subset.range);
            assert!(subset.count <= all.count);
        }
        assert_eq!(above.total_count(), 2);
    }

    #[test]
    fn test_range_wider_than_f64_max() {
        let edges = BinEdges::spanning(&[-1e308, 1e308], 30).unwrap();
        let boundaries = edges.edges().collect::<Vec<_>>();
        assert!(boundaries.iter().all(|edge| edge.is_finite()));
        assert!(boundaries.is_sorted());
        assert_eq!(boundaries[0], -1e308);
        assert_eq!(boundaries[15], 0.0);
        assert_eq!(boundaries[30], 1e308);

        let histogram = edges.histogram([-1e308, -1e307, 1e307, 1e308]);
        let counts = histogram.bins.iter().map(|bin| bin.count).collect::<Vec<_>>();
        assert_eq!(counts[0], 1);
        assert_eq!(counts[13], 1);
        assert_eq!(counts[16], 1);
        assert_eq!(counts[29], 1);
        assert_eq!(histogram.total_count(), 4);
    }

    #[test]
    fn test_invalid_arguments() {
        assert_eq!(BinEdges::spanning(&[], 30), Err(StatsError::EmptySample));
        assert_eq!(BinEdges::linear(0.0, 1.0, 0), Err(StatsError::ZeroBins));
    }
}
