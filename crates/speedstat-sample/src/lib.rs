//! Sources of vehicle speed samples.
//!
//! A [`SpeedSample`] is produced either by drawing from a normal distribution
//! ([`SimulationParams`]) or by parsing literal values typed by the user
//! ([`parse_speeds`]). [`SampleSource`] selects between the two.
//!
//! # Example
//!
//! ```
//! use speedstat_sample::{SampleSeed, SampleSource, SimulationParams};
//!
//! let params = SimulationParams { count: 100, mean: 70.0, std_dev: 10.0 };
//! let first = SampleSource::Simulated(params).collect(&mut SampleSeed::new(42).rng()).unwrap();
//! let second = SampleSource::Simulated(params).collect(&mut SampleSeed::new(42).rng()).unwrap();
//! assert_eq!(first, second);
//!
//! let manual = SampleSource::Manual("60, 65, 70".to_owned());
//! let sample = manual.collect(&mut rand::rng()).unwrap();
//! assert_eq!(sample.as_slice(), &[60.0, 65.0, 70.0]);
//! ```

use rand::Rng;

pub use self::{
    manual::{ParseSpeedsError, parse_speeds},
    simulated::{SampleSeed, SimulationError, SimulationParams},
};

mod manual;
mod simulated;

/// A non-empty sequence of vehicle speeds in a consistent unit.
///
/// Order only matters for display; no statistic depends on it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct SpeedSample {
    values: Vec<f64>,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("speed sample must contain at least one value")]
pub struct EmptySampleError;

impl SpeedSample {
    /// Wraps `values`, rejecting an empty sequence.
    pub fn new(values: Vec<f64>) -> Result<Self, EmptySampleError> {
        if values.is_empty() {
            return Err(EmptySampleError);
        }
        Ok(Self { values })
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

impl AsRef<[f64]> for SpeedSample {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

/// Where the speed sample for a session comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleSource {
    /// Draw values from a normal distribution.
    Simulated(SimulationParams),
    /// Parse comma-separated literal values.
    Manual(String),
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SampleError {
    #[display("{_0}")]
    Simulation(SimulationError),
    #[display("{_0}")]
    Parse(ParseSpeedsError),
}

impl SampleSource {
    /// Produces a sample from this source.
    ///
    /// `rng` is only consulted by [`SampleSource::Simulated`].
    pub fn collect<R>(&self, rng: &mut R) -> Result<SpeedSample, SampleError>
    where
        R: Rng + ?Sized,
    {
        let sample = match self {
            Self::Simulated(params) => params.generate(rng)?,
            Self::Manual(text) => parse_speeds(text)?,
        };
        Ok(sample)
    }
}
