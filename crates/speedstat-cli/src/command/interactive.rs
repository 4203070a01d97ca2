use std::io;

use anyhow::Context as _;

use crate::{chart, config::AnalysisConfig, report::HistogramPlot, session::Session};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct InteractiveArg {
    /// Seed for simulated speeds (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Skip the histogram viewer after the report
    #[arg(long)]
    no_chart: bool,
}

pub(crate) fn run(config: &AnalysisConfig, arg: &InteractiveArg) -> anyhow::Result<()> {
    let mut rng = super::resolve_seed(arg.seed).rng();
    let outcome = Session::new(config, io::stdin().lock(), io::stdout().lock(), &mut rng)
        .run()
        .context("Interactive session failed")?;

    if arg.no_chart {
        return Ok(());
    }
    let plot = HistogramPlot::new(config, &outcome.sample, &outcome.analysis)
        .context("Failed to bin speeds for the chart")?;
    chart::show(&plot).context("Failed to display the chart")?;
    Ok(())
}
