use clap::{ArgAction, Parser, Subcommand};
use rand::Rng as _;
use speedstat_sample::SampleSeed;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use crate::config::AnalysisConfig;

use self::{analyze::AnalyzeArg, interactive::InteractiveArg};

mod analyze;
mod interactive;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v: info, -vv: debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Walk through an analysis with interactive prompts
    Interactive(#[clap(flatten)] InteractiveArg),
    /// Analyze a sample in one shot, without prompts
    Analyze(#[clap(flatten)] AnalyzeArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);

    let config = AnalysisConfig::default();
    match args
        .mode
        .unwrap_or(Mode::Interactive(InteractiveArg::default()))
    {
        Mode::Interactive(arg) => interactive::run(&config, &arg)?,
        Mode::Analyze(arg) => analyze::run(&config, &arg)?,
    }
    Ok(())
}

/// Logs go to stderr so they never mix with the report on stdout.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Uses `seed` if given, otherwise draws one so the run can be reproduced.
fn resolve_seed(seed: Option<u64>) -> SampleSeed {
    let seed = seed.map_or_else(|| rand::rng().random(), SampleSeed::new);
    tracing::debug!(%seed, "sample seed");
    seed
}
