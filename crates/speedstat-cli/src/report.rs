//! Text, JSON and chart presentation of an analysis.

use std::io::{self, Write};

use anyhow::Context as _;
use speedstat_sample::SpeedSample;
use speedstat_stats::{
    StatsError,
    histogram::{BinEdges, Histogram},
    outliers::OutlierPartition,
};

use crate::{
    analysis::{Analysis, AnalysisResult},
    config::AnalysisConfig,
};

fn join_speeds(speeds: &[f64]) -> String {
    speeds
        .iter()
        .map(|speed| format!("{speed:.2}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reports what outlier removal did to the sample.
pub fn write_outlier_summary<W>(out: &mut W, partition: &OutlierPartition) -> io::Result<()>
where
    W: Write + ?Sized,
{
    if partition.has_outliers() {
        writeln!(out, "Outliers removed: {}", join_speeds(&partition.removed))?;
    } else {
        writeln!(out, "No outliers found.")?;
    }
    writeln!(
        out,
        "Dataset size after outlier removal: {} speeds remaining.",
        partition.cleaned.len()
    )
}

/// Writes the human-readable analysis summary.
pub fn write_report<W>(out: &mut W, result: &AnalysisResult) -> io::Result<()>
where
    W: Write + ?Sized,
{
    let n = result.percentile;
    writeln!(out, "\nAnalysis Results:")?;
    writeln!(out, "- Average Vehicle Speed: {:.2} mph", result.mean)?;
    writeln!(out, "- Speed Standard Deviation: {:.2} mph", result.std_dev)?;
    writeln!(
        out,
        "- {n}th Percentile Speed: {:.2} mph (with outliers)",
        result.percentile_with_outliers
    )?;
    writeln!(
        out,
        "- {n}th Percentile Speed: {:.2} mph (without outliers)",
        result.percentile_without_outliers
    )?;
    writeln!(
        out,
        "- Recommended Speed Limit: {:.2} mph (with outliers)",
        result.recommended_limit_with_outliers()
    )?;
    writeln!(
        out,
        "- Recommended Speed Limit: {:.2} mph (without outliers)",
        result.recommended_limit_without_outliers()
    )?;
    writeln!(
        out,
        "- Number of Vehicles Above Threshold: {} of {}",
        result.above_threshold_count, result.total_count
    )?;
    writeln!(out, "- Total Vehicles: {}", result.total_count)?;
    if let Some(removed) = &result.removed_outliers {
        if removed.is_empty() {
            writeln!(out, "- Removed Outliers: none")?;
        } else {
            writeln!(out, "- Removed Outliers: {}", join_speeds(removed))?;
        }
    }
    Ok(())
}

/// Writes `result` as pretty-printed JSON followed by a newline.
pub fn write_json<W>(out: &mut W, result: &AnalysisResult) -> anyhow::Result<()>
where
    W: Write,
{
    serde_json::to_writer_pretty(&mut *out, result).context("Failed to write JSON report")?;
    writeln!(out).context("Failed to write newline after JSON report")?;
    Ok(())
}

/// Everything the chart viewer needs: two series over shared bins and a threshold marker.
#[derive(Debug, Clone)]
pub struct HistogramPlot {
    pub edges: BinEdges,
    pub all: Histogram,
    pub highlighted: Histogram,
    pub all_label: String,
    pub highlighted_label: String,
    pub threshold: f64,
    pub threshold_label: String,
}

impl HistogramPlot {
    /// Bins the full sample and the above-threshold subset over the sample's range.
    pub fn new(
        config: &AnalysisConfig,
        sample: &SpeedSample,
        analysis: &Analysis,
    ) -> Result<Self, StatsError> {
        let edges = BinEdges::spanning(sample.as_slice(), config.histogram_bins)?;
        let all = edges.histogram(sample.as_slice().iter().copied());
        let highlighted = edges.histogram(analysis.above_threshold.iter().copied());
        let n = analysis.result.percentile;
        let threshold = analysis.result.percentile_with_outliers;
        Ok(Self {
            edges,
            all,
            highlighted,
            all_label: "Vehicle Speeds".to_owned(),
            highlighted_label: format!("Speeds > {n}th Percentile"),
            threshold,
            threshold_label: format!("{n}th Percentile = {threshold:.2} mph"),
        })
    }
}
