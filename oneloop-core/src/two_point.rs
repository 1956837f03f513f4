use num_complex::Complex64;

use crate::classify::{classify, ClassificationTag};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::one_point::a0;
use crate::special::{cln, csqrt, kallen};
use crate::types::{check_causal_masses, KinematicPoint, LaurentSeries};

/// Imaginary nudge applied to Feynman-parameter roots that land exactly on
/// the real axis, implementing the `−i0` prescription of the integrand.
const ROOT_SHIFT: f64 = 1e-40;

/// Raw bubble in the internal normalization. Always `ε⁻² = 0`, `ε⁻¹ = 1`;
/// the finite part is `−∫₀¹ dx ln(f(x)/μ²)` with
/// `f(x) = p·x² − (p + m1² − m2²)·x + m1² − i0`.
pub(crate) fn b0(
    p: Complex64,
    m1: Complex64,
    m2: Complex64,
    config: &Config,
) -> Result<LaurentSeries> {
    let point = KinematicPoint::TwoPoint { p, m1, m2 };
    let tag = classify(&point, config);
    if config.log_level.traces() {
        tracing::debug!(?tag, "bubble branch");
    }
    if tag == ClassificationTag::IrSingular {
        return Err(Error::SingularConfiguration(
            "bubble with p, m1 and m2 all vanishing has no regularized value".into(),
        ));
    }

    let tol = config.tolerance_at(point.scale());
    let mu2 = Complex64::new(config.mu2, 0.0);
    let epsilon_0 = if p.norm() <= tol {
        if p.norm() > 0.0 && config.log_level.warns() {
            tracing::warn!(
                momentum = p.norm(),
                tolerance = tol,
                "bubble momentum inside on-shell threshold: using zero-momentum expansion"
            );
        }
        zero_momentum_finite(m1, m2, tol, config)
    } else {
        momentum_finite(p, m1, m2, mu2)
    };

    let one = Complex64::new(1.0, 0.0);
    Ok(LaurentSeries::new(epsilon_0, one, Complex64::default()))
}

/// Evaluate the 2-point (bubble) function, applying the configured
/// normalization convention. Symmetric under `m1 ↔ m2` exchange.
pub fn evaluate(
    p: Complex64,
    m1: Complex64,
    m2: Complex64,
    config: &Config,
) -> Result<LaurentSeries> {
    check_causal_masses(&[m1, m2])?;
    Ok(b0(p, m1, m2, config)?.scaled(config.unit_convention.factor().into()))
}

/// Finite part at vanishing momentum, where the generic Feynman-parameter
/// roots run away to infinity and the tadpole difference quotient takes
/// over: `B0(0, m1², m2²) = [A0(m1²) − A0(m2²)]/(m1² − m2²)` at order ε⁰,
/// with the analytic limit `A0(m²)/m² − 1 = −ln(m²/μ²)` at equal masses.
fn zero_momentum_finite(m1: Complex64, m2: Complex64, tol: f64, config: &Config) -> Complex64 {
    let one = Complex64::new(1.0, 0.0);
    if (m1 - m2).norm() <= tol {
        let m = 0.5 * (m1 + m2);
        return a0(m, config).epsilon_0() / m - one;
    }
    (a0(m1, config).epsilon_0() - a0(m2, config).epsilon_0()) / (m1 - m2)
}

/// Generic finite part for nonzero momentum, valid for arbitrary (including
/// vanishing or complex) masses, below, at and above threshold:
///
/// `ε⁰ = 2 − cln(p/μ²) − ℓ(x₊) − ℓ(x₋) − ∫₀¹ η(x) dx`
///
/// with `x±` the roots of `f`, `ℓ(x₀) = (1−x₀)ln(1−x₀) + x₀ ln(−x₀)`, and
/// η the piecewise-constant branch mismatch of the log factorization.
fn momentum_finite(p: Complex64, m1: Complex64, m2: Complex64, mu2: Complex64) -> Complex64 {
    let two = Complex64::new(2.0, 0.0);
    let (xp, xm) = feynman_roots(p, m1, m2);
    two - cln(p / mu2) - ell(xp) - ell(xm) - eta_integral(p, m1, m2, xp, xm)
}

/// Roots of `f(x) = p·x² − (p + m1² − m2²)·x + m1²`, continued off the real
/// axis according to the `−i0` prescription of the integrand: a root where
/// `f' > 0` moves to `+i0`, a root where `f' < 0` to `−i0`.
fn feynman_roots(p: Complex64, m1: Complex64, m2: Complex64) -> (Complex64, Complex64) {
    let sum = p + m1 - m2;
    let k = csqrt(kallen(p, m1, m2));
    // Align the discriminant root with `sum` so the addition below cannot
    // cancel catastrophically; the companion root comes from the product
    // x₊·x₋ = m1²/p.
    let (aligned, orientation) = if (sum.conj() * k).re >= 0.0 {
        (k, 1.0)
    } else {
        (-k, -1.0)
    };
    let mut big = (sum + aligned) / (2.0 * p);
    let mut other = if big == Complex64::default() {
        Complex64::default()
    } else {
        m1 / (p * big)
    };
    // f'(root) = ±aligned at the two roots; apply δx = i·0⁺/f' when a root
    // sits exactly on the real axis (real kinematics above threshold).
    if k.im == 0.0 && k.re > 0.0 {
        if big.im == 0.0 {
            big += Complex64::new(0.0, orientation * ROOT_SHIFT);
        }
        if other.im == 0.0 {
            other -= Complex64::new(0.0, orientation * ROOT_SHIFT);
        }
    }
    (big, other)
}

/// `∫₀¹ ln(x − x₀) dx` up to its constant `−1`:
/// `ℓ(x₀) = (1−x₀)·ln(1−x₀) + x₀·ln(−x₀)`.
fn ell(x0: Complex64) -> Complex64 {
    let one = Complex64::new(1.0, 0.0);
    if x0 == Complex64::default() {
        return Complex64::default();
    }
    if x0 == one {
        return cln(-one);
    }
    (one - x0) * cln(one - x0) + x0 * cln(-x0)
}

/// Integrated branch mismatch of `ln f = ln p + ln(x−x₊) + ln(x−x₋)`.
/// The mismatch is a piecewise-constant multiple of 2πi, jumping only where
/// a root crosses the integration path; each subinterval is probed at its
/// midpoint and the multiples are length-weighted.
fn eta_integral(
    p: Complex64,
    m1: Complex64,
    m2: Complex64,
    xp: Complex64,
    xm: Complex64,
) -> Complex64 {
    let two_pi = 2.0 * std::f64::consts::PI;
    let mut cuts = vec![0.0_f64, 1.0];
    for root in [xp, xm] {
        if root.im.abs() < 1e-20 && root.re > 0.0 && root.re < 1.0 {
            cuts.push(root.re);
        }
    }
    cuts.sort_by(|a, b| a.partial_cmp(b).expect("finite cut positions"));

    let mut acc = Complex64::default();
    for pair in cuts.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if b - a < 1e-18 {
            continue;
        }
        let x = Complex64::new(0.5 * (a + b), 0.0);
        let f = p * x * x - (p + m1 - m2) * x + m1;
        if f == Complex64::default() {
            continue;
        }
        let mismatch = cln(f) - cln(p) - cln(x - xp) - cln(x - xm);
        let windings = (mismatch.im / two_pi).round();
        acc += Complex64::new(0.0, windings * two_pi * (b - a));
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn c(x: f64) -> Complex64 {
        Complex64::new(x, 0.0)
    }

    fn cfg() -> Config {
        Config::default()
    }

    fn finite_part(p: f64, m1: f64, m2: f64) -> Complex64 {
        evaluate(c(p), c(m1), c(m2), &cfg()).unwrap().epsilon_0()
    }

    #[test]
    fn pole_structure_is_pure_single_pole() {
        let r = evaluate(c(1.0), c(0.5), c(0.2), &cfg()).unwrap();
        assert_eq!(r.epsilon_minus_2(), c(0.0));
        assert!((r.epsilon_minus_1() - c(1.0)).norm() < 1e-15);
    }

    #[test]
    fn mass_exchange_symmetry() {
        let a = finite_part(1.0, 0.5, 0.2);
        let b = finite_part(1.0, 0.2, 0.5);
        assert!((a - b).norm() < 1e-12, "{a} vs {b}");
    }

    #[test]
    fn scaleless_point_is_singular() {
        let err = evaluate(c(0.0), c(0.0), c(0.0), &cfg()).unwrap_err();
        assert!(matches!(err, Error::SingularConfiguration(_)));
    }

    #[test]
    fn zero_momentum_equal_masses() {
        // B0(0, m², m²) = 1/ε − ln(m²/μ²).
        let e0 = finite_part(0.0, 0.25, 0.25);
        assert!((e0 - c(-0.25_f64.ln())).norm() < 1e-14);
    }

    #[test]
    fn zero_momentum_one_mass() {
        // B0(0, m², 0) = 1/ε + 1 − ln(m²/μ²).
        let e0 = finite_part(0.0, 0.25, 0.0);
        assert!((e0 - c(1.0 - 0.25_f64.ln())).norm() < 1e-14);
    }

    #[test]
    fn massless_timelike_bubble() {
        // B0(p, 0, 0) = 1/ε + 2 − ln(p/μ²) + iπ for p > 0.
        let e0 = finite_part(4.0, 0.0, 0.0);
        let expected = Complex64::new(2.0 - 4.0_f64.ln(), PI);
        assert!((e0 - expected).norm() < 1e-12, "{e0} vs {expected}");
    }

    #[test]
    fn massless_spacelike_bubble_is_real() {
        // B0(p, 0, 0) = 1/ε + 2 − ln(−p/μ²) for p < 0.
        let e0 = finite_part(-4.0, 0.0, 0.0);
        let expected = c(2.0 - 4.0_f64.ln());
        assert!((e0 - expected).norm() < 1e-12, "{e0} vs {expected}");
    }

    #[test]
    fn on_shell_one_mass_bubble() {
        // B0(m², m², 0) = 1/ε + 2 − ln(m²/μ²).
        let e0 = finite_part(0.25, 0.25, 0.0);
        let expected = c(2.0 - 0.25_f64.ln());
        assert!((e0 - expected).norm() < 1e-10, "{e0} vs {expected}");
    }

    #[test]
    fn above_threshold_absorptive_part() {
        // Im B0(p, m², m²) = π·√λ(p, m², m²)/p above threshold.
        let (p, m) = (10.0, 1.0);
        let e0 = finite_part(p, m, m);
        let lam = kallen(c(p), c(m), c(m)).re;
        assert!(lam > 0.0);
        let expected_im = PI * lam.sqrt() / p;
        assert!((e0.im - expected_im).abs() < 1e-10, "{} vs {expected_im}", e0.im);
    }

    #[test]
    fn below_threshold_is_real() {
        let e0 = finite_part(1.0, 0.5, 0.2);
        assert!(e0.im.abs() < 1e-12, "unexpected absorptive part {}", e0.im);
    }

    #[test]
    fn continuity_at_the_zero_momentum_boundary() {
        // Approaching p → 0 from the generic branch converges to the
        // degenerate-branch value.
        let deg = finite_part(0.0, 0.5, 0.2);
        let gen = finite_part(1e-7, 0.5, 0.2);
        assert!((deg - gen).norm() < 1e-6, "{deg} vs {gen}");
    }

    #[test]
    fn scale_shift_moves_finite_part_by_log_times_pole() {
        let k = 4.0;
        let base = Config::default();
        let shifted = Config::default().with_renormalization_scale(k).unwrap();
        let r1 = evaluate(c(1.0), c(0.5), c(0.2), &base).unwrap();
        let r2 = evaluate(c(1.0), c(0.5), c(0.2), &shifted).unwrap();
        assert_eq!(r1.epsilon_minus_1(), r2.epsilon_minus_1());
        let shift = r2.epsilon_0() - r1.epsilon_0();
        let expected = r1.epsilon_minus_1() * k.ln();
        assert!((shift - expected).norm() < 1e-13);
    }

    #[test]
    fn complex_masses_are_continuous_with_real_limit() {
        let real = finite_part(1.0, 0.5, 0.2);
        let eps = evaluate(c(1.0), Complex64::new(0.5, -1e-8), c(0.2), &cfg())
            .unwrap()
            .epsilon_0();
        assert!((real - eps).norm() < 1e-6);
    }
}
