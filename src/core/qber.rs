//! Dark-count limited QBER model.
//!
//! Every dark count lands on a random bit value, so the fraction of noise
//! clicks among all clicks is taken as the error rate:
//! $\delta = f_d / (n_t + f_d)$.

use crate::core::channels::{ChannelParameters, DistanceGrid, PhotonRateCurve};
use ndarray::{Array1, Zip};

/// QBER (fraction in [0, 1]) at each distance of a [`DistanceGrid`].
pub type QberCurve = Array1<f64>;

/// QBER for a photon arrival `rate` and a dark count rate `dark_count_rate`.
///
/// With no signal and no dark counts (0/0) the link carries nothing but
/// noise, so the result is defined as 1.0.
pub fn qber(rate: f64, dark_count_rate: f64) -> f64 {
    let total = rate + dark_count_rate;
    if total <= 0.0 {
        return 1.0;
    }
    dark_count_rate / total
}

/// Applies [`qber`] elementwise over a rate curve.
pub fn qber_curve(rates: &PhotonRateCurve, dark_count_rate: f64) -> QberCurve {
    rates.mapv(|rate| qber(rate, dark_count_rate))
}

/// QBER over a grid straight from the channel parameters.
pub fn qber_over_grid(params: &ChannelParameters, grid: &DistanceGrid) -> QberCurve {
    let mut curve = Array1::zeros(grid.len());
    Zip::from(&mut curve)
        .and(grid.distances())
        .for_each(|q, &d| *q = qber(params.photon_rate(d), params.dark_count_rate()));
    curve
}
