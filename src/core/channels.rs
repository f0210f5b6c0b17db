use crate::core::errors::ConfigurationError;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Photon arrival rate (photons/s) at each distance of a [`DistanceGrid`].
pub type PhotonRateCurve = Array1<f64>;

/// Physical parameters of a fibre link.
///
/// Validated once at construction; every field is read-only afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawChannelParameters")]
pub struct ChannelParameters {
    /// Fibre loss β (per km, base-10 exponent).
    attenuation: f64,
    /// Detector quantum efficiency η.
    detector_efficiency: f64,
    /// Dark count frequency fd (Hz).
    dark_count_rate: f64,
    /// Source emission rate n0 (photons/s).
    emission_rate: f64,
    /// Transmission T of an extra lossy optic (1.0 when absent).
    optical_transmission: f64,
}

#[derive(Deserialize)]
struct RawChannelParameters {
    attenuation: f64,
    detector_efficiency: f64,
    dark_count_rate: f64,
    emission_rate: f64,
    #[serde(default = "unit_transmission")]
    optical_transmission: f64,
}

fn unit_transmission() -> f64 {
    1.0
}

impl TryFrom<RawChannelParameters> for ChannelParameters {
    type Error = ConfigurationError;

    fn try_from(raw: RawChannelParameters) -> Result<Self, Self::Error> {
        ChannelParameters::new(
            raw.attenuation,
            raw.detector_efficiency,
            raw.dark_count_rate,
            raw.emission_rate,
        )?
        .with_optical_transmission(raw.optical_transmission)
    }
}

impl ChannelParameters {
    /// Creates a parameter set without any extra optical component (T = 1).
    pub fn new(
        attenuation: f64,
        detector_efficiency: f64,
        dark_count_rate: f64,
        emission_rate: f64,
    ) -> Result<Self, ConfigurationError> {
        if !(attenuation.is_finite() && attenuation > 0.0) {
            return Err(ConfigurationError::InvalidAttenuation(attenuation));
        }
        if !is_unit_fraction(detector_efficiency) {
            return Err(ConfigurationError::InvalidDetectorEfficiency(
                detector_efficiency,
            ));
        }
        if !(dark_count_rate.is_finite() && dark_count_rate >= 0.0) {
            return Err(ConfigurationError::InvalidDarkCountRate(dark_count_rate));
        }
        if !(emission_rate.is_finite() && emission_rate > 0.0) {
            return Err(ConfigurationError::InvalidEmissionRate(emission_rate));
        }

        Ok(Self {
            attenuation,
            detector_efficiency,
            dark_count_rate,
            emission_rate,
            optical_transmission: 1.0,
        })
    }

    /// Returns a copy with a lossy optic (e.g. a polarizer) of transmission `t` in the path.
    pub fn with_optical_transmission(mut self, t: f64) -> Result<Self, ConfigurationError> {
        if !is_unit_fraction(t) {
            return Err(ConfigurationError::InvalidTransmission(t));
        }
        self.optical_transmission = t;
        Ok(self)
    }

    /// Returns a copy with a different emission rate.
    pub fn with_emission_rate(mut self, n0: f64) -> Result<Self, ConfigurationError> {
        if !(n0.is_finite() && n0 > 0.0) {
            return Err(ConfigurationError::InvalidEmissionRate(n0));
        }
        self.emission_rate = n0;
        Ok(self)
    }

    pub fn attenuation(&self) -> f64 {
        self.attenuation
    }

    pub fn detector_efficiency(&self) -> f64 {
        self.detector_efficiency
    }

    pub fn dark_count_rate(&self) -> f64 {
        self.dark_count_rate
    }

    pub fn emission_rate(&self) -> f64 {
        self.emission_rate
    }

    pub fn optical_transmission(&self) -> f64 {
        self.optical_transmission
    }

    /// Arrival rate at the receiver at `distance` km.
    ///
    /// $n_0 \eta T \cdot 10^{-\beta d}$
    pub fn photon_rate(&self, distance: f64) -> f64 {
        self.emission_rate
            * self.detector_efficiency
            * self.optical_transmission
            * 10f64.powf(-self.attenuation * distance)
    }

    /// Evaluates [`Self::photon_rate`] over every distance of `grid`.
    pub fn photon_rate_curve(&self, grid: &DistanceGrid) -> PhotonRateCurve {
        grid.distances().mapv(|d| self.photon_rate(d))
    }
}

/// Ordered, strictly increasing set of non-negative distances (km).
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceGrid {
    distances: Array1<f64>,
}

impl DistanceGrid {
    pub fn new(distances: Vec<f64>) -> Result<Self, ConfigurationError> {
        if distances.is_empty() {
            return Err(ConfigurationError::EmptyGrid);
        }

        for (index, &value) in distances.iter().enumerate() {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigurationError::InvalidDistance { index, value });
            }
        }

        if let Some(index) = find_unordered(&distances) {
            return Err(ConfigurationError::UnorderedGrid { index });
        }

        Ok(Self {
            distances: Array1::from(distances),
        })
    }

    /// `samples` evenly spaced distances from `start` to `stop`, both included.
    pub fn linspace(start: f64, stop: f64, samples: usize) -> Result<Self, ConfigurationError> {
        if samples == 0 {
            return Err(ConfigurationError::EmptyGrid);
        }
        if samples == 1 {
            return Self::new(vec![start]);
        }
        if !(start.is_finite() && stop.is_finite() && start >= 0.0 && stop > start) {
            return Err(ConfigurationError::InvalidGridBounds { start, stop });
        }

        let step = (stop - start) / (samples - 1) as f64;
        let mut distances: Vec<f64> = (0..samples).map(|i| start + step * i as f64).collect();
        // Pin the last sample so rounding never overshoots the requested range
        distances[samples - 1] = stop;

        Self::new(distances)
    }

    pub fn distances(&self) -> &Array1<f64> {
        &self.distances
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// A constructed grid is never empty.
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.distances.get(index).copied()
    }
}

/// Index of the first sample that does not exceed its predecessor
fn find_unordered(values: &[f64]) -> Option<usize> {
    values
        .windows(2)
        .position(|pair| pair[1] <= pair[0])
        .map(|i| i + 1)
}

/// Validate fraction in (0, 1]
fn is_unit_fraction(x: f64) -> bool {
    x > 0.0 && x <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * b.abs().max(1.0)
    }

    fn reference() -> ChannelParameters {
        ChannelParameters::new(0.05, 0.1, 10.0, 2e7).unwrap()
    }

    #[test]
    fn test_rate_at_origin() {
        let params = reference();
        assert_eq!(params.photon_rate(0.0), 2e7 * 0.1);

        let polarized = params.with_optical_transmission(0.5).unwrap();
        assert_eq!(polarized.photon_rate(0.0), 2e7 * 0.1 * 0.5);
    }

    #[test]
    fn test_rate_decays_one_decade_per_twenty_km() {
        let params = reference();
        let ratio = params.photon_rate(20.0) / params.photon_rate(0.0);
        assert!(approx_eq(ratio, 0.1, 1e-12));
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert_eq!(
            ChannelParameters::new(0.0, 0.1, 10.0, 2e7),
            Err(ConfigurationError::InvalidAttenuation(0.0))
        );
        assert_eq!(
            ChannelParameters::new(0.05, 1.5, 10.0, 2e7),
            Err(ConfigurationError::InvalidDetectorEfficiency(1.5))
        );
        assert_eq!(
            ChannelParameters::new(0.05, 0.1, -1.0, 2e7),
            Err(ConfigurationError::InvalidDarkCountRate(-1.0))
        );
        assert_eq!(
            ChannelParameters::new(0.05, 0.1, 10.0, 0.0),
            Err(ConfigurationError::InvalidEmissionRate(0.0))
        );
        assert!(matches!(
            ChannelParameters::new(f64::NAN, 0.1, 10.0, 2e7),
            Err(ConfigurationError::InvalidAttenuation(_))
        ));
        assert_eq!(
            reference().with_optical_transmission(0.0),
            Err(ConfigurationError::InvalidTransmission(0.0))
        );
    }

    #[test]
    fn test_full_efficiency_is_valid() {
        let params = ChannelParameters::new(0.2, 1.0, 0.0, 1.0)
            .unwrap()
            .with_optical_transmission(1.0)
            .unwrap();
        assert_eq!(params.photon_rate(0.0), 1.0);
    }

    #[test]
    fn test_deserialize_validates() {
        let params: ChannelParameters = toml::from_str(
            "attenuation = 0.05\ndetector_efficiency = 0.1\ndark_count_rate = 10.0\nemission_rate = 2e7\n",
        )
        .unwrap();
        assert_eq!(params, reference());

        let polarized: ChannelParameters = toml::from_str(
            "attenuation = 0.05\ndetector_efficiency = 0.1\ndark_count_rate = 10.0\nemission_rate = 2e7\noptical_transmission = 0.5\n",
        )
        .unwrap();
        assert_eq!(polarized.optical_transmission(), 0.5);

        let invalid = toml::from_str::<ChannelParameters>(
            "attenuation = -1.0\ndetector_efficiency = 0.1\ndark_count_rate = 10.0\nemission_rate = 2e7\n",
        );
        assert!(invalid.is_err());
    }

    #[test]
    fn test_grid_validation() {
        assert_eq!(DistanceGrid::new(vec![]), Err(ConfigurationError::EmptyGrid));
        assert_eq!(
            DistanceGrid::new(vec![0.0, -1.0]),
            Err(ConfigurationError::InvalidDistance {
                index: 1,
                value: -1.0
            })
        );
        assert_eq!(
            DistanceGrid::new(vec![0.0, 5.0, 5.0]),
            Err(ConfigurationError::UnorderedGrid { index: 2 })
        );
        assert!(DistanceGrid::new(vec![3.0]).is_ok());
    }

    #[test]
    fn test_linspace() {
        let grid = DistanceGrid::linspace(0.0, 100.0, 5).unwrap();
        assert_eq!(grid.distances().to_vec(), vec![0.0, 25.0, 50.0, 75.0, 100.0]);

        let single = DistanceGrid::linspace(7.0, 100.0, 1).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single.get(0), Some(7.0));

        let fine = DistanceGrid::linspace(0.0, 100.0, 50_000).unwrap();
        assert_eq!(fine.get(49_999), Some(100.0));

        assert!(matches!(
            DistanceGrid::linspace(10.0, 0.0, 3),
            Err(ConfigurationError::InvalidGridBounds { .. })
        ));
        assert_eq!(
            DistanceGrid::linspace(0.0, 1.0, 0),
            Err(ConfigurationError::EmptyGrid)
        );
    }

    #[test]
    fn test_rate_curve_is_index_aligned() {
        let grid = DistanceGrid::linspace(0.0, 100.0, 11).unwrap();
        let params = reference();
        let curve = params.photon_rate_curve(&grid);

        assert_eq!(curve.len(), grid.len());
        for (rate, d) in curve.iter().zip(grid.distances().iter()) {
            assert_eq!(*rate, params.photon_rate(*d));
        }
    }
}
