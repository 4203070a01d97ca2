use speedstat_sample::SimulationParams;
use speedstat_stats::outliers::DEFAULT_Z_THRESHOLD;

use crate::analysis::PercentileSpec;

const DEFAULT_NUM_VEHICLES: usize = 1000;
const DEFAULT_MEAN_SPEED: f64 = 70.0; // mph
const DEFAULT_STD_DEV_SPEED: f64 = 10.0; // mph
const HISTOGRAM_BINS: usize = 30;

/// A named percentile standard offered in the selection menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PercentilePreset {
    /// Short identifier accepted on the command line.
    pub key: &'static str,
    /// Label shown in the interactive menu.
    pub label: &'static str,
    pub percentile: PercentileSpec,
}

/// Immutable settings shared by every stage of one analysis.
///
/// Built once at startup and passed by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Parameters used when the user asks for simulated data.
    pub simulation: SimulationParams,
    /// Percentile standards, in menu order.
    pub presets: [PercentilePreset; 2],
    pub z_threshold: f64,
    pub histogram_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationParams {
                count: DEFAULT_NUM_VEHICLES,
                mean: DEFAULT_MEAN_SPEED,
                std_dev: DEFAULT_STD_DEV_SPEED,
            },
            presets: [
                PercentilePreset {
                    key: "eu",
                    label: "EU Standard",
                    percentile: PercentileSpec::EU_STANDARD,
                },
                PercentilePreset {
                    key: "us",
                    label: "US Standard",
                    percentile: PercentileSpec::US_STANDARD,
                },
            ],
            z_threshold: DEFAULT_Z_THRESHOLD,
            histogram_bins: HISTOGRAM_BINS,
        }
    }
}

impl AnalysisConfig {
    /// Looks up a preset by its command-line key, ignoring case.
    pub fn preset_by_key(&self, key: &str) -> Option<&PercentilePreset> {
        self.presets
            .iter()
            .find(|preset| preset.key.eq_ignore_ascii_case(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.simulation.count, 1000);
        assert_eq!(config.simulation.mean, 70.0);
        assert_eq!(config.simulation.std_dev, 10.0);
        assert_eq!(config.presets[0].percentile.value(), 85);
        assert_eq!(config.presets[1].percentile.value(), 90);
        assert_eq!(config.z_threshold, 3.0);
        assert_eq!(config.histogram_bins, 30);
    }

    #[test]
    fn test_preset_lookup() {
        let config = AnalysisConfig::default();
        assert_eq!(config.preset_by_key("US").unwrap().percentile.value(), 90);
        assert!(config.preset_by_key("uk").is_none());
    }
}
