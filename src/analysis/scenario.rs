//! Studies over an explicit list of link scenarios.
//!
//! A study compares receiver setups (polarizing beam splitter, lossy
//! polarizer) across several emission rates on a shared distance grid.
//! Results are returned in declaration order and keyed by label, never by
//! a floating-point rate.

use crate::analysis::secrecy::{LinkAnalysis, SecurityThreshold, analyze};
use crate::core::channels::{ChannelParameters, DistanceGrid};
use crate::core::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Receiver optics between the fibre and the detectors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Setup {
    /// Polarizing beam splitter; no extra loss.
    PolarizingBeamSplitter,
    /// Single polarizer passing a `transmission` fraction of the photons.
    Polarizer { transmission: f64 },
}

impl Setup {
    pub fn transmission(&self) -> f64 {
        match self {
            Setup::PolarizingBeamSplitter => 1.0,
            Setup::Polarizer { transmission } => *transmission,
        }
    }
}

impl fmt::Display for Setup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setup::PolarizingBeamSplitter => write!(f, "PBS"),
            Setup::Polarizer { .. } => write!(f, "Polarizer"),
        }
    }
}

/// One fully specified link to analyze.
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    pub label: String,
    pub setup: Setup,
    pub parameters: ChannelParameters,
}

impl Scenario {
    /// Applies `setup` to `base`; the label is derived from setup and emission rate.
    pub fn new(setup: Setup, base: ChannelParameters) -> Result<Self, ConfigurationError> {
        let parameters = base.with_optical_transmission(setup.transmission())?;
        let label = format!("{} n0 = {:.1e}", setup, parameters.emission_rate());
        Ok(Self {
            label,
            setup,
            parameters,
        })
    }
}

/// Result of one scenario.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioOutcome {
    pub label: String,
    pub setup: Setup,
    pub emission_rate: f64,
    pub analysis: LinkAnalysis,
}

/// Channel fields shared by every scenario of a study.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SharedChannel {
    pub attenuation: f64,
    pub detector_efficiency: f64,
    pub dark_count_rate: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub start: f64,
    pub stop: f64,
    pub samples: usize,
}

/// Declarative description of a study, usually read from TOML.
///
/// ```toml
/// threshold = 0.11
/// emission_rates = [2e7, 2e10]
///
/// [grid]
/// start = 0.0
/// stop = 100.0
/// samples = 500
///
/// [channel]
/// attenuation = 0.05
/// detector_efficiency = 0.1
/// dark_count_rate = 10.0
///
/// [[setups]]
/// kind = "polarizing_beam_splitter"
///
/// [[setups]]
/// kind = "polarizer"
/// transmission = 0.5
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig {
    #[serde(default)]
    pub threshold: SecurityThreshold,
    pub grid: GridConfig,
    pub channel: SharedChannel,
    pub emission_rates: Vec<f64>,
    #[serde(default = "default_setups")]
    pub setups: Vec<Setup>,
}

fn default_setups() -> Vec<Setup> {
    vec![Setup::PolarizingBeamSplitter]
}

impl StudyConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(text).map_err(|err| ConfigurationError::InvalidStudy(err.to_string()))
    }
}

/// A grid, a threshold and an ordered list of scenarios.
#[derive(Clone, Debug, PartialEq)]
pub struct Study {
    pub grid: DistanceGrid,
    pub threshold: SecurityThreshold,
    pub scenarios: Vec<Scenario>,
}

impl Study {
    pub fn new(grid: DistanceGrid, threshold: SecurityThreshold) -> Self {
        Self {
            grid,
            threshold,
            scenarios: Vec::new(),
        }
    }

    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Expands a config into setups × emission rates, setup-major.
    pub fn from_config(config: &StudyConfig) -> Result<Self, ConfigurationError> {
        if config.emission_rates.is_empty() {
            return Err(ConfigurationError::InvalidStudy(
                "at least one emission rate is required".to_string(),
            ));
        }
        if config.setups.is_empty() {
            return Err(ConfigurationError::InvalidStudy(
                "at least one setup is required".to_string(),
            ));
        }

        let grid = DistanceGrid::linspace(config.grid.start, config.grid.stop, config.grid.samples)?;
        let mut study = Study::new(grid, config.threshold);

        for &setup in &config.setups {
            for &n0 in &config.emission_rates {
                let base = ChannelParameters::new(
                    config.channel.attenuation,
                    config.channel.detector_efficiency,
                    config.channel.dark_count_rate,
                    n0,
                )?;
                study = study.with_scenario(Scenario::new(setup, base)?);
            }
        }

        Ok(study)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigurationError> {
        Self::from_config(&StudyConfig::from_toml_str(text)?)
    }

    /// Analyzes every scenario; each call produces new curves.
    pub fn run(&self) -> Vec<ScenarioOutcome> {
        self.scenarios
            .iter()
            .map(|scenario| {
                let analysis = analyze(&scenario.parameters, &self.grid, self.threshold);
                tracing::debug!(
                    label = %scenario.label,
                    max_secure_distance = analysis.max_secure_distance_or_zero(),
                    "scenario analyzed"
                );
                ScenarioOutcome {
                    label: scenario.label.clone(),
                    setup: scenario.setup,
                    emission_rate: scenario.parameters.emission_rate(),
                    analysis,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(n0: f64) -> ChannelParameters {
        ChannelParameters::new(0.05, 0.1, 10.0, n0).unwrap()
    }

    #[test]
    fn test_label_format() {
        let scenario = Scenario::new(Setup::PolarizingBeamSplitter, base(2e7)).unwrap();
        assert_eq!(scenario.label, "PBS n0 = 2.0e7");

        let scenario = Scenario::new(Setup::Polarizer { transmission: 0.5 }, base(2e10)).unwrap();
        assert_eq!(scenario.label, "Polarizer n0 = 2.0e10");
        assert_eq!(scenario.parameters.optical_transmission(), 0.5);
    }

    #[test]
    fn test_invalid_polarizer_transmission() {
        assert_eq!(
            Scenario::new(Setup::Polarizer { transmission: 1.5 }, base(2e7)),
            Err(ConfigurationError::InvalidTransmission(1.5))
        );
    }

    #[test]
    fn test_run_preserves_order() {
        let grid = DistanceGrid::linspace(0.0, 100.0, 101).unwrap();
        let study = Study::new(grid, SecurityThreshold::default())
            .with_scenario(Scenario::new(Setup::PolarizingBeamSplitter, base(2e10)).unwrap())
            .with_scenario(Scenario::new(Setup::PolarizingBeamSplitter, base(2e7)).unwrap());

        let outcomes = study.run();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].emission_rate, 2e10);
        assert_eq!(outcomes[1].emission_rate, 2e7);
    }

    #[test]
    fn test_runs_are_independent() {
        let grid = DistanceGrid::linspace(0.0, 50.0, 51).unwrap();
        let study = Study::new(grid, SecurityThreshold::default())
            .with_scenario(Scenario::new(Setup::PolarizingBeamSplitter, base(2e7)).unwrap());

        let first = study.run();
        let second = study.run();
        assert_eq!(first, second);
    }
}
