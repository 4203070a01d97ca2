use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_distr::Normal;
use rand_pcg::Pcg32;

use crate::SpeedSample;

/// Parameters of the normal distribution simulated speeds are drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    /// Number of vehicles to simulate.
    pub count: usize,
    /// Mean speed.
    pub mean: f64,
    /// Standard deviation of the speed.
    pub std_dev: f64,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SimulationError {
    #[display("number of simulated vehicles must be positive")]
    ZeroCount,
    #[display("standard deviation must be a positive finite number, got {std_dev}")]
    InvalidStdDev { std_dev: f64 },
    #[display("mean speed must be finite, got {mean}")]
    InvalidMean { mean: f64 },
}

impl SimulationParams {
    /// Draws `count` speeds from `Normal(mean, std_dev)` using `rng`.
    ///
    /// The output depends only on the parameters and the state of `rng`, so a
    /// generator built from a fixed [`SampleSeed`] always yields the same sample.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError`] if `count` is zero, `std_dev` is not
    /// positive, or either distribution parameter is not finite.
    pub fn generate<R>(&self, rng: &mut R) -> Result<SpeedSample, SimulationError>
    where
        R: Rng + ?Sized,
    {
        let Self {
            count,
            mean,
            std_dev,
        } = *self;
        if count == 0 {
            return Err(SimulationError::ZeroCount);
        }
        if !mean.is_finite() {
            return Err(SimulationError::InvalidMean { mean });
        }
        if !std_dev.is_finite() || std_dev <= 0.0 {
            return Err(SimulationError::InvalidStdDev { std_dev });
        }

        let normal =
            Normal::new(mean, std_dev).map_err(|_| SimulationError::InvalidStdDev { std_dev })?;
        let values = (0..count).map(|_| normal.sample(&mut *rng)).collect();
        Ok(SpeedSample { values })
    }
}

/// Seed for deterministic speed simulation.
///
/// Two generators built from the same seed produce the same stream, which
/// makes simulated sessions reproducible.
///
/// # Example
///
/// ```
/// use rand::Rng as _;
/// use speedstat_sample::SampleSeed;
///
/// let seed: SampleSeed = rand::rng().random();
/// let a: u32 = seed.rng().random();
/// let b: u32 = seed.rng().random();
/// assert_eq!(a, b);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::From, serde::Serialize,
)]
#[serde(transparent)]
pub struct SampleSeed(u64);

/// Allows generating random `SampleSeed` values with `rng.random()`.
impl Distribution<SampleSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SampleSeed {
        SampleSeed(rng.random())
    }
}

impl SampleSeed {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Creates a fresh generator positioned at the start of this seed's stream.
    #[must_use]
    pub fn rng(self) -> Pcg32 {
        Pcg32::seed_from_u64(self.0)
    }
}

#[cfg(test)]
mod tests {
    use speedstat_stats::descriptive::DescriptiveStats;

    use super::*;

    const PARAMS: SimulationParams = SimulationParams {
        count: 100,
        mean: 70.0,
        std_dev: 10.0,
    };

    #[test]
    fn test_same_seed_same_sample() {
        let first = PARAMS.generate(&mut SampleSeed::new(42).rng()).unwrap();
        let second = PARAMS.generate(&mut SampleSeed::new(42).rng()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 100);
    }

    #[test]
    fn test_different_seed_different_sample() {
        let first = PARAMS.generate(&mut SampleSeed::new(1).rng()).unwrap();
        let second = PARAMS.generate(&mut SampleSeed::new(2).rng()).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_sample_follows_parameters() {
        let params = SimulationParams {
            count: 10_000,
            ..PARAMS
        };
        let sample = params.generate(&mut SampleSeed::new(7).rng()).unwrap();
        let stats = DescriptiveStats::new(sample.as_slice()).unwrap();
        assert!((stats.mean - 70.0).abs() < 0.5, "mean was {}", stats.mean);
        assert!(
            (stats.std_dev - 10.0).abs() < 0.5,
            "std dev was {}",
            stats.std_dev
        );
    }

    #[test]
    fn test_invalid_parameters() {
        let mut rng = SampleSeed::new(0).rng();
        let zero = SimulationParams { count: 0, ..PARAMS };
        assert_eq!(zero.generate(&mut rng), Err(SimulationError::ZeroCount));

        for std_dev in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let params = SimulationParams { std_dev, ..PARAMS };
            assert!(matches!(
                params.generate(&mut rng),
                Err(SimulationError::InvalidStdDev { .. })
            ));
        }

        let params = SimulationParams {
            mean: f64::NAN,
            ..PARAMS
        };
        assert!(matches!(
            params.generate(&mut rng),
            Err(SimulationError::InvalidMean { .. })
        ));
    }
}
