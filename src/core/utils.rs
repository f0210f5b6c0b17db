//! Special functions used by the statistics layer.
//!
//! This module contains:
//! - Lanczos approximation of $\ln \Gamma(x)$.
//! - The regularized incomplete beta function $I_x(a, b)$.
//! - Student-t cumulative distribution and quantile functions.

use std::f64::consts::PI;

const MAX_ITERATIONS: usize = 300;
const EPSILON: f64 = 3e-16;
const FPMIN: f64 = 1e-300;

/// Natural log of the Gamma function for x > 0.
pub fn ln_gamma(x: f64) -> f64 {
    // Lanczos approximation (g = 7, n = 9)
    if x < 0.5 {
        // Reflection formula: Γ(x) = π / (sin(πx) · Γ(1-x))
        let reflected = ln_gamma(1.0 - x);
        (PI / (PI * x).sin()).ln() - reflected
    } else {
        let coefficients: [f64; 9] = [
            0.999_999_999_999_809_9,
            676.520_368_121_885_1,
            -1_259.139_216_722_402_8,
            771.323_428_777_653_1,
            -176.615_029_162_140_6,
            12.507_343_278_686_905,
            -0.138_571_095_265_720_12,
            9.984_369_578_019_572e-6,
            1.505_632_735_149_311_6e-7,
        ];
        let g = 7.0_f64;
        let z = x - 1.0;
        let mut ag = coefficients[0];
        for (i, c) in coefficients.iter().enumerate().skip(1) {
            ag += c / (z + i as f64);
        }
        let t = z + g + 0.5;
        0.5 * (2.0 * PI).ln() + (z + 0.5) * t.ln() - t + ag.ln()
    }
}

/// Regularized incomplete beta function $I_x(a, b)$ for a, b > 0.
pub fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_front =
        ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();

    // The continued fraction converges fast only on this side of the mean
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// Modified Lentz evaluation of the incomplete beta continued fraction.
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = clamp_tiny(1.0 - qab * x / qap).recip();
    let mut h = d;

    for m in 1..=MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2.0 * m;

        // Even step
        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = clamp_tiny(1.0 + aa * d).recip();
        c = clamp_tiny(1.0 + aa / c);
        h *= d * c;

        // Odd step
        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = clamp_tiny(1.0 + aa * d).recip();
        c = clamp_tiny(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPSILON {
            break;
        }
    }
    h
}

fn clamp_tiny(v: f64) -> f64 {
    if v.abs() < FPMIN { FPMIN } else { v }
}

/// CDF of Student's t distribution with `dof` degrees of freedom.
pub fn student_t_cdf(t: f64, dof: f64) -> f64 {
    let x = dof / (dof + t * t);
    let tail = 0.5 * regularized_incomplete_beta(0.5 * dof, 0.5, x);
    if t >= 0.0 { 1.0 - tail } else { tail }
}

/// Inverse CDF of Student's t distribution.
///
/// `p` must lie strictly inside (0, 1) and `dof` must be positive.
pub fn student_t_quantile(p: f64, dof: f64) -> f64 {
    if p == 0.5 {
        return 0.0;
    }
    if p < 0.5 {
        return -student_t_quantile(1.0 - p, dof);
    }

    // Bracket the root, then bisect. The CDF is monotonic so this always converges.
    let mut lo = 0.0;
    let mut hi = 1.0;
    while student_t_cdf(hi, dof) < p && hi < 1e12 {
        lo = hi;
        hi *= 2.0;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if student_t_cdf(mid, dof) < p {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < 1e-12 * hi.max(1.0) {
            break;
        }
    }
    0.5 * (lo + hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_ln_gamma_factorial() {
        // Γ(5) = 4! = 24
        assert!(approx_eq(ln_gamma(5.0), 24f64.ln(), 1e-10));
        assert!(approx_eq(ln_gamma(1.0), 0.0, 1e-10));
        // Γ(1/2) = √π
        assert!(approx_eq(ln_gamma(0.5), PI.sqrt().ln(), 1e-10));
    }

    #[test]
    fn test_incomplete_beta_bounds_and_symmetry() {
        assert_eq!(regularized_incomplete_beta(2.0, 3.0, 0.0), 0.0);
        assert_eq!(regularized_incomplete_beta(2.0, 3.0, 1.0), 1.0);
        // I_x(a, b) = 1 - I_{1-x}(b, a)
        let lhs = regularized_incomplete_beta(2.5, 4.0, 0.3);
        let rhs = 1.0 - regularized_incomplete_beta(4.0, 2.5, 0.7);
        assert!(approx_eq(lhs, rhs, 1e-12));
        // I_x(1, 1) = x
        assert!(approx_eq(regularized_incomplete_beta(1.0, 1.0, 0.42), 0.42, 1e-12));
    }

    #[test]
    fn test_t_cdf_symmetry() {
        assert!(approx_eq(student_t_cdf(0.0, 5.0), 0.5, 1e-12));
        let upper = student_t_cdf(1.3, 7.0);
        let lower = student_t_cdf(-1.3, 7.0);
        assert!(approx_eq(upper + lower, 1.0, 1e-12));
    }

    #[test]
    fn test_t_quantile_table_values() {
        // One-sided 95% points
        assert!(approx_eq(student_t_quantile(0.95, 1.0), 6.3138, 1e-3));
        assert!(approx_eq(student_t_quantile(0.95, 2.0), 2.9200, 1e-3));
        assert!(approx_eq(student_t_quantile(0.95, 9.0), 1.8331, 1e-3));
        assert!(approx_eq(student_t_quantile(0.95, 30.0), 1.6973, 1e-3));
        // Two-sided 95% at 9 degrees of freedom
        assert!(approx_eq(student_t_quantile(0.975, 9.0), 2.2622, 1e-3));
    }

    #[test]
    fn test_t_quantile_approaches_normal() {
        let q = student_t_quantile(0.95, 120.0);
        assert!(approx_eq(q, 1.6577, 1e-3));
        assert!(q > 1.6449);
    }

    #[test]
    fn test_t_quantile_lower_tail() {
        let q = student_t_quantile(0.05, 9.0);
        assert!(approx_eq(q, -student_t_quantile(0.95, 9.0), 1e-10));
    }
}
