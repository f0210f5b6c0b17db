//! Shannon binary entropy.
//!
//! $H(\delta) = -\delta \log_2 \delta - (1-\delta) \log_2 (1-\delta)$
//!
//! The endpoints are defined explicitly as $H(0) = H(1) = 0$ instead of being
//! evaluated, so `0 * log2(0)` never turns into a NaN. Arguments outside
//! $[0, 1]$ are treated as the nearest endpoint.

use ndarray::Array1;

/// Binary entropy of a Bernoulli(`delta`) variable, in bits.
pub fn binary_entropy(delta: f64) -> f64 {
    if delta <= 0.0 || delta >= 1.0 {
        return 0.0;
    }
    -delta * delta.log2() - (1.0 - delta) * (1.0 - delta).log2()
}

/// Applies [`binary_entropy`] elementwise over a curve.
pub fn binary_entropy_curve(deltas: &Array1<f64>) -> Array1<f64> {
    deltas.mapv(binary_entropy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_maximum_at_half() {
        assert_eq!(binary_entropy(0.5), 1.0);
    }

    #[test]
    fn test_endpoints_are_zero() {
        assert_eq!(binary_entropy(0.0), 0.0);
        assert_eq!(binary_entropy(1.0), 0.0);
        assert_eq!(binary_entropy(-0.2), 0.0);
        assert_eq!(binary_entropy(1.3), 0.0);
    }

    #[test]
    fn test_known_value() {
        // H(0.11) is the classic ~0.5 bit crossing for 1 - 2H
        assert!(approx_eq(binary_entropy(0.11), 0.4999, 1e-3));
    }

    #[test]
    fn test_tiny_argument_is_finite() {
        let h = binary_entropy(1e-300);
        assert!(h.is_finite());
        assert!(h >= 0.0);
    }

    #[test]
    fn test_curve_matches_pointwise() {
        let deltas = array![0.0, 0.1, 0.5, 0.9, 1.0];
        let curve = binary_entropy_curve(&deltas);
        for (d, h) in deltas.iter().zip(curve.iter()) {
            assert_eq!(*h, binary_entropy(*d));
        }
        assert!(approx_eq(curve[1], curve[3], 1e-12));
    }
}
