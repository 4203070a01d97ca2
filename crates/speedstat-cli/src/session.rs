//! Interactive analysis session.
//!
//! The session walks through a fixed sequence of states:
//!
//! ```text
//! CollectInput → OutlierRemoval → SelectPercentile → ComputeAndDisplay → Terminal
//! ```
//!
//! Invalid answers re-prompt the current step only; the sample and the outlier
//! decision collected so far are kept. There is no retry limit, but reaching
//! the end of the input stream aborts the session.

use std::io::{self, BufRead, Write};

use rand::Rng;
use speedstat_sample::{SampleError, SampleSource, SimulationError, SpeedSample};
use speedstat_stats::StatsError;

use crate::{
    analysis::{self, Analysis, OutlierDecision, PercentileSpec, SelectionError},
    config::{AnalysisConfig, PercentilePreset},
    report,
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SessionError {
    #[display("input ended before the session finished")]
    #[from(skip)]
    InputClosed,
    #[display("console I/O failed")]
    Io(io::Error),
    #[display("{_0}")]
    Simulation(SimulationError),
    #[display("{_0}")]
    Stats(StatsError),
}

/// What a finished session hands to the chart presenter.
#[derive(Debug)]
pub struct SessionOutcome {
    pub sample: SpeedSample,
    pub analysis: Analysis,
}

#[derive(Debug)]
enum SessionState {
    CollectInput,
    OutlierRemoval {
        sample: SpeedSample,
    },
    SelectPercentile {
        sample: SpeedSample,
        outliers: OutlierDecision,
    },
    ComputeAndDisplay {
        sample: SpeedSample,
        outliers: OutlierDecision,
        percentile: PercentileSpec,
    },
    Terminal(SessionOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceChoice {
    Simulate,
    Manual,
}

impl SourceChoice {
    fn parse(input: &str) -> Result<Self, SelectionError> {
        match input {
            "1" => Ok(Self::Simulate),
            "2" => Ok(Self::Manual),
            _ => Err(SelectionError::InvalidOption {
                input: input.to_owned(),
                expected: "1 or 2",
            }),
        }
    }
}

fn parse_yes_no(input: &str) -> Result<bool, SelectionError> {
    match input.to_ascii_lowercase().as_str() {
        "yes" => Ok(true),
        "no" => Ok(false),
        _ => Err(SelectionError::InvalidOption {
            input: input.to_owned(),
            expected: "'yes' or 'no'",
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PercentileChoice {
    Preset(PercentileSpec),
    Custom,
}

impl PercentileChoice {
    /// Options `1..=presets.len()` pick a preset; the next number asks for a custom value.
    fn parse(input: &str, presets: &[PercentilePreset]) -> Result<Self, SelectionError> {
        let invalid = || SelectionError::InvalidOption {
            input: input.to_owned(),
            expected: "one of the listed options",
        };
        let option = input.parse::<usize>().map_err(|_| invalid())?;
        match option.checked_sub(1) {
            Some(idx) if idx < presets.len() => Ok(Self::Preset(presets[idx].percentile)),
            Some(idx) if idx == presets.len() => Ok(Self::Custom),
            _ => Err(invalid()),
        }
    }
}

/// Drives one analysis session over a line-based console.
pub struct Session<'a, I, O, R: ?Sized> {
    config: &'a AnalysisConfig,
    input: I,
    output: O,
    rng: &'a mut R,
}

impl<'a, I, O, R> Session<'a, I, O, R>
where
    I: BufRead,
    O: Write,
    R: Rng + ?Sized,
{
    /// `rng` is only used if the user asks for simulated data.
    pub fn new(config: &'a AnalysisConfig, input: I, output: O, rng: &'a mut R) -> Self {
        Self {
            config,
            input,
            output,
            rng,
        }
    }

    /// Runs the session to completion and prints the text report.
    pub fn run(mut self) -> Result<SessionOutcome, SessionError> {
        writeln!(self.output, "\nWelcome to the Vehicle Speed Analysis Tool!")?;

        let mut state = SessionState::CollectInput;
        loop {
            tracing::debug!(state = state_name(&state), "session step");
            state = match state {
                SessionState::CollectInput => SessionState::OutlierRemoval {
                    sample: self.collect_input()?,
                },
                SessionState::OutlierRemoval { sample } => {
                    let outliers = self.choose_outlier_removal(&sample)?;
                    SessionState::SelectPercentile { sample, outliers }
                }
                SessionState::SelectPercentile { sample, outliers } => {
                    let percentile = self.select_percentile()?;
                    SessionState::ComputeAndDisplay {
                        sample,
                        outliers,
                        percentile,
                    }
                }
                SessionState::ComputeAndDisplay {
                    sample,
                    outliers,
                    percentile,
                } => {
                    let analysis = analysis::analyze(&sample, &outliers, percentile)?;
                    report::write_report(&mut self.output, &analysis.result)?;
                    self.output.flush()?;
                    SessionState::Terminal(SessionOutcome { sample, analysis })
                }
                SessionState::Terminal(outcome) => return Ok(outcome),
            };
        }
    }

    fn collect_input(&mut self) -> Result<SpeedSample, SessionError> {
        loop {
            writeln!(self.output, "\nChoose an option to provide speed data:")?;
            writeln!(
                self.output,
                "1. Simulate vehicle speeds (default random data)."
            )?;
            writeln!(self.output, "2. Enter a list of speeds manually.")?;
            let answer = self.prompt("Enter 1 or 2: ")?;

            let source = match SourceChoice::parse(&answer) {
                Ok(SourceChoice::Simulate) => {
                    let params = self.config.simulation;
                    writeln!(
                        self.output,
                        "\nSimulating {} vehicle speeds with mean = {} mph and std deviation = {} mph.",
                        params.count, params.mean, params.std_dev
                    )?;
                    SampleSource::Simulated(params)
                }
                Ok(SourceChoice::Manual) => {
                    writeln!(
                        self.output,
                        "\nEnter a list of speeds, separated by commas (ex: 60, 70, 80, ... ):"
                    )?;
                    SampleSource::Manual(self.read_line()?)
                }
                Err(e) => {
                    self.report_retry(&e)?;
                    continue;
                }
            };

            match source.collect(&mut *self.rng) {
                Ok(sample) => {
                    tracing::info!(count = sample.len(), "speed sample collected");
                    return Ok(sample);
                }
                Err(SampleError::Parse(e)) => self.report_retry(&e)?,
                // the parameters come from the configuration; asking again cannot fix them
                Err(SampleError::Simulation(e)) => return Err(e.into()),
            }
        }
    }

    fn choose_outlier_removal(
        &mut self,
        sample: &SpeedSample,
    ) -> Result<OutlierDecision, SessionError> {
        loop {
            writeln!(self.output, "\nWould you like to remove outliers?")?;
            let answer = self.prompt("Enter 'yes' or 'no': ")?;
            match parse_yes_no(&answer) {
                Ok(true) => {
                    let decision = OutlierDecision::remove(sample, self.config.z_threshold)?;
                    if let OutlierDecision::Removed(partition) = &decision {
                        report::write_outlier_summary(&mut self.output, partition)?;
                    }
                    return Ok(decision);
                }
                Ok(false) => {
                    writeln!(self.output, "Proceeding with the original data.")?;
                    return Ok(OutlierDecision::Kept);
                }
                Err(e) => self.report_retry(&e)?,
            }
        }
    }

    fn select_percentile(&mut self) -> Result<PercentileSpec, SessionError> {
        let presets = self.config.presets;
        loop {
            writeln!(self.output, "\nChoose the percentile threshold:")?;
            for (idx, preset) in presets.iter().enumerate() {
                writeln!(
                    self.output,
                    "{}. {} ({}%)",
                    idx + 1,
                    preset.label,
                    preset.percentile
                )?;
            }
            let custom_option = presets.len() + 1;
            writeln!(self.output, "{custom_option}. Enter a custom percentile.")?;
            let answer = self.prompt("Enter 1, 2, or 3: ")?;

            let selected = match PercentileChoice::parse(&answer, &presets) {
                Ok(PercentileChoice::Preset(percentile)) => Ok(percentile),
                Ok(PercentileChoice::Custom) => self
                    .prompt("Enter your custom percentile (0-100): ")?
                    .parse::<PercentileSpec>(),
                Err(e) => Err(e),
            };
            match selected {
                Ok(percentile) => return Ok(percentile),
                Err(e) => self.report_retry(&e)?,
            }
        }
    }

    fn report_retry<E>(&mut self, error: &E) -> Result<(), SessionError>
    where
        E: std::error::Error,
    {
        tracing::warn!(%error, "invalid input, asking again");
        writeln!(self.output, "Error: {error}")?;
        Ok(())
    }

    fn prompt(&mut self, message: &str) -> Result<String, SessionError> {
        write!(self.output, "{message}")?;
        self.read_line()
    }

    fn read_line(&mut self) -> Result<String, SessionError> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(SessionError::InputClosed);
        }
        Ok(line.trim().to_owned())
    }
}

fn state_name(state: &SessionState) -> &'static str {
    match state {
        SessionState::CollectInput => "collect-input",
        SessionState::OutlierRemoval { .. } => "outlier-removal",
        SessionState::SelectPercentile { .. } => "select-percentile",
        SessionState::ComputeAndDisplay { .. } => "compute-and-display",
        SessionState::Terminal(_) => "terminal",
    }
}
