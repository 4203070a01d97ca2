use std::{
    io::{self, Write},
    str::FromStr,
};

use anyhow::Context as _;
use speedstat_sample::{SampleSource, SpeedSample};

use crate::{
    analysis::{self, Analysis, OutlierDecision, PercentileSpec, SelectionError},
    chart,
    config::AnalysisConfig,
    report::{self, HistogramPlot},
};

/// A preset key such as `eu`, or a custom percentile.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PercentileArg {
    Preset(String),
    Custom(PercentileSpec),
}

impl Default for PercentileArg {
    fn default() -> Self {
        Self::Preset("eu".to_owned())
    }
}

impl FromStr for PercentileArg {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with(|c: char| c.is_ascii_alphabetic()) {
            Ok(Self::Preset(s.to_owned()))
        } else {
            s.parse().map(Self::Custom)
        }
    }
}

impl PercentileArg {
    fn resolve(&self, config: &AnalysisConfig) -> anyhow::Result<PercentileSpec> {
        match self {
            Self::Preset(key) => config
                .preset_by_key(key)
                .map(|preset| preset.percentile)
                .with_context(|| {
                    let keys = config
                        .presets
                        .iter()
                        .map(|preset| preset.key)
                        .collect::<Vec<_>>();
                    format!("Unknown percentile preset '{key}' (expected {})", keys.join(", "))
                }),
            Self::Custom(percentile) => Ok(*percentile),
        }
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeArg {
    /// Comma-separated speeds in mph; simulated speeds are used if omitted
    #[arg(long)]
    speeds: Option<String>,
    /// Seed for simulated speeds (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Remove Z-score outliers before computing the cleaned percentile
    #[arg(long)]
    remove_outliers: bool,
    /// Percentile preset (eu, us) or a whole number in 0..=100
    #[arg(long, default_value = "eu")]
    percentile: PercentileArg,
    /// Print the result as JSON instead of the text report
    #[arg(long)]
    json: bool,
    /// Skip the histogram viewer
    #[arg(long)]
    no_chart: bool,
}

pub(crate) fn run(config: &AnalysisConfig, arg: &AnalyzeArg) -> anyhow::Result<()> {
    let (sample, analysis) = write_analysis(config, arg, &mut io::stdout().lock())?;

    if arg.json || arg.no_chart {
        return Ok(());
    }
    let plot = HistogramPlot::new(config, &sample, &analysis)
        .context("Failed to bin speeds for the chart")?;
    chart::show(&plot).context("Failed to display the chart")?;
    Ok(())
}

/// Collects the sample, analyzes it and writes the report to `out`.
fn write_analysis<W>(
    config: &AnalysisConfig,
    arg: &AnalyzeArg,
    out: &mut W,
) -> anyhow::Result<(SpeedSample, Analysis)>
where
    W: Write,
{
    let percentile = arg.percentile.resolve(config)?;
    let source = match &arg.speeds {
        Some(text) => SampleSource::Manual(text.clone()),
        None => SampleSource::Simulated(config.simulation),
    };
    let mut rng = super::resolve_seed(arg.seed).rng();
    let sample = source
        .collect(&mut rng)
        .context("Failed to collect speed sample")?;
    tracing::info!(count = sample.len(), "speed sample collected");

    let outliers = if arg.remove_outliers {
        OutlierDecision::remove(&sample, config.z_threshold)
            .context("Failed to detect outliers")?
    } else {
        OutlierDecision::Kept
    };
    let analysis =
        analysis::analyze(&sample, &outliers, percentile).context("Failed to analyze speeds")?;

    if arg.json {
        report::write_json(out, &analysis.result)?;
    } else {
        if let OutlierDecision::Removed(partition) = &outliers {
            report::write_outlier_summary(out, partition)
                .context("Failed to write outlier summary")?;
        }
        report::write_report(out, &analysis.result).context("Failed to write report")?;
    }
    out.flush().context("Failed to flush report")?;
    Ok((sample, analysis))
}
