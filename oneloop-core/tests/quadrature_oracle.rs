use num_complex::Complex64;
use oneloop_core::{Config, Evaluator};

fn c(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

/// Composite-midpoint quadrature of the bubble's Feynman-parameter integral
/// `−∫₀¹ dx ln(f(x)/μ²)`, `f(x) = p·x² − (p + m1² − m2²)·x + m1²`, valid as
/// a real oracle wherever f stays positive on [0, 1].
fn bubble_finite_by_quadrature(p: f64, m1: f64, m2: f64, mu2: f64, n: usize) -> f64 {
    let h = 1.0 / n as f64;
    let mut acc = 0.0;
    for i in 0..n {
        let x = (i as f64 + 0.5) * h;
        let f = p * x * x - (p + m1 - m2) * x + m1;
        assert!(f > 0.0, "oracle kinematics must keep f positive");
        acc += (f / mu2).ln() * h;
    }
    -acc
}

#[test]
fn below_threshold_bubble_matches_quadrature() {
    // p = 1 lies below the two-particle threshold (√0.5 + √0.2)² ≈ 1.33.
    let (p, m1, m2) = (1.0, 0.5, 0.2);
    let oracle = bubble_finite_by_quadrature(p, m1, m2, 1.0, 200_000);
    let ev = Evaluator::new(Config::default());
    let e0 = ev.two_point(c(p), c(m1), c(m2)).unwrap().epsilon_0();
    assert!(e0.im.abs() < 1e-12, "no absorptive part below threshold");
    assert!(
        (e0.re - oracle).abs() < 1e-8,
        "engine {} vs quadrature {oracle}",
        e0.re
    );
}

#[test]
fn spacelike_bubble_matches_quadrature() {
    let (p, m1, m2) = (-3.0, 1.0, 0.25);
    let oracle = bubble_finite_by_quadrature(p, m1, m2, 1.0, 200_000);
    let ev = Evaluator::new(Config::default());
    let e0 = ev.two_point(c(p), c(m1), c(m2)).unwrap().epsilon_0();
    assert!(e0.im.abs() < 1e-12);
    assert!(
        (e0.re - oracle).abs() < 1e-8,
        "engine {} vs quadrature {oracle}",
        e0.re
    );
}

#[test]
fn shifted_scale_bubble_matches_quadrature() {
    let (p, m1, m2) = (0.5, 0.9, 0.4);
    let mu2 = 7.0;
    let oracle = bubble_finite_by_quadrature(p, m1, m2, mu2, 200_000);
    let config = Config::default().with_renormalization_scale(mu2).unwrap();
    let ev = Evaluator::new(config);
    let e0 = ev.two_point(c(p), c(m1), c(m2)).unwrap().epsilon_0();
    assert!(
        (e0.re - oracle).abs() < 1e-8,
        "engine {} vs quadrature {oracle}",
        e0.re
    );
}
