//! Secret key fraction and secure distance estimation.
//!
//! The secret fraction is the Shannon bound $1 - 2H(\delta)$: one bit of raw
//! correlation minus the eavesdropper information on both the error
//! correction and the privacy amplification side. A negative value means the
//! link is insecure, so it is clamped at zero.

use crate::core::channels::{ChannelParameters, DistanceGrid, PhotonRateCurve};
use crate::core::entropy::{binary_entropy, binary_entropy_curve};
use crate::core::errors::ConfigurationError;
use crate::core::qber::{QberCurve, qber_curve};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Secret key fraction in [0, 1] at each distance of a [`DistanceGrid`].
pub type SecretRateCurve = Array1<f64>;

/// Maximum QBER (as a fraction) at which the link is still considered secure.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SecurityThreshold(f64);

impl SecurityThreshold {
    /// Standard bound for BB84-family protocols.
    pub const STANDARD: SecurityThreshold = SecurityThreshold(0.11);

    pub fn new(value: f64) -> Result<Self, ConfigurationError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigurationError::InvalidThreshold(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for SecurityThreshold {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl TryFrom<f64> for SecurityThreshold {
    type Error = ConfigurationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SecurityThreshold> for f64 {
    fn from(threshold: SecurityThreshold) -> f64 {
        threshold.0
    }
}

/// Secret key fraction for an observed QBER `delta`.
///
/// Error rates of one half or more are insecure regardless of the entropy
/// bound, which is symmetric around 0.5.
pub fn secret_rate(delta: f64) -> f64 {
    if delta >= 0.5 {
        return 0.0;
    }
    clamp_rate(1.0 - 2.0 * binary_entropy(delta))
}

/// Applies [`secret_rate`] elementwise over a QBER curve.
pub fn secret_rate_curve(deltas: &QberCurve) -> SecretRateCurve {
    deltas.mapv(secret_rate)
}

fn clamp_rate(rate: f64) -> f64 {
    rate.max(0.0)
}

/// Largest grid distance whose QBER is at or below `threshold`.
///
/// This is the last satisfying index, not the first threshold crossing: a
/// curve that rises above the threshold and drops back below it further out
/// reports the farther distance. `None` when no distance qualifies.
pub fn max_secure_distance(
    deltas: &QberCurve,
    grid: &DistanceGrid,
    threshold: SecurityThreshold,
) -> Result<Option<f64>, ConfigurationError> {
    if deltas.len() != grid.len() {
        return Err(ConfigurationError::LengthMismatch {
            curve: deltas.len(),
            grid: grid.len(),
        });
    }

    Ok(last_secure_index(deltas, threshold).and_then(|i| grid.get(i)))
}

fn last_secure_index(deltas: &QberCurve, threshold: SecurityThreshold) -> Option<usize> {
    deltas
        .iter()
        .enumerate()
        .filter(|&(_, &q)| q <= threshold.value())
        .map(|(i, _)| i)
        .last()
}

/// Every derived curve of one link scenario, index-aligned with its grid.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkAnalysis {
    pub threshold: SecurityThreshold,
    pub photon_rates: PhotonRateCurve,
    pub qber: QberCurve,
    pub entropy: Array1<f64>,
    pub secret_rates: SecretRateCurve,
    /// `None` when no grid distance is secure.
    pub max_secure_distance: Option<f64>,
}

impl LinkAnalysis {
    /// Secure distance with the "absent" case reported as 0 km.
    ///
    /// This is indistinguishable from a link that is secure only at the
    /// origin; use `max_secure_distance` when the difference matters.
    pub fn max_secure_distance_or_zero(&self) -> f64 {
        self.max_secure_distance.unwrap_or(0.0)
    }

    /// Whether any grid distance is secure.
    pub fn is_secure(&self) -> bool {
        self.max_secure_distance.is_some()
    }
}

/// Runs the full chain (rate, QBER, entropy, secret fraction, secure distance)
/// for one parameter set. Always returns a fresh record.
pub fn analyze(
    params: &ChannelParameters,
    grid: &DistanceGrid,
    threshold: SecurityThreshold,
) -> LinkAnalysis {
    let photon_rates = params.photon_rate_curve(grid);
    let qber = qber_curve(&photon_rates, params.dark_count_rate());
    let entropy = binary_entropy_curve(&qber);
    let secret_rates = secret_rate_curve(&qber);

    let max_secure_distance = last_secure_index(&qber, threshold).and_then(|i| grid.get(i));

    match max_secure_distance {
        Some(distance) => tracing::debug!(
            emission_rate = params.emission_rate(),
            transmission = params.optical_transmission(),
            distance,
            "secure distance found"
        ),
        None => tracing::warn!(
            emission_rate = params.emission_rate(),
            transmission = params.optical_transmission(),
            threshold = threshold.value(),
            "no grid distance is secure"
        ),
    }

    LinkAnalysis {
        threshold,
        photon_rates,
        qber,
        entropy,
        secret_rates,
        max_secure_distance,
    }
}
