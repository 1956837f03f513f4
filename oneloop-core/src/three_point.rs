use num_complex::Complex64;
use std::f64::consts::PI;

use crate::classify::{classify, ClassificationTag};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::reduction::{gram3, KinematicMatrix};
use crate::special::{cln, dilog, quadratic_roots};
use crate::two_point::b0;
use crate::types::{check_causal_masses, KinematicPoint, LaurentSeries};

/// Imaginary nudge for quadratic roots that land exactly on the real axis,
/// implementing the `−i0` prescription of the integrand.
const ROOT_SHIFT: f64 = 1e-40;
/// Larger nudge for the rotated pole line, so that pole-root separations
/// keep a definite imaginary sign.
const POLE_SHIFT: f64 = 1e-30;

/// Raw triangle in the internal normalization.
///
/// Internally-massive triangles are finite; every ε-pole comes from the
/// massless family, which is handled in closed form. The generic branch is
/// the dilogarithmic edge decomposition of the double Feynman-parameter
/// integral; near-degenerate Gram configurations reduce to the three pinched
/// bubbles instead.
#[allow(clippy::too_many_arguments)]
pub(crate) fn c0(
    p1: Complex64,
    p2: Complex64,
    p3: Complex64,
    m1: Complex64,
    m2: Complex64,
    m3: Complex64,
    config: &Config,
) -> Result<LaurentSeries> {
    let point = KinematicPoint::ThreePoint {
        p1,
        p2,
        p3,
        m1,
        m2,
        m3,
    };
    let tag = classify(&point, config);
    if config.log_level.traces() {
        tracing::debug!(?tag, "triangle branch");
    }
    let scale = point.scale();
    let tol = config.tolerance_at(scale);
    let mu2 = Complex64::new(config.mu2, 0.0);

    if tag == ClassificationTag::IrSingular {
        return massless_family([p1, p2, p3], tol, mu2, scale, config);
    }
    check_ir_regulated([p1, p2, p3], [m1, m2, m3], tol)?;

    if p1.norm() <= tol && p2.norm() <= tol && p3.norm() <= tol {
        return Ok(LaurentSeries::finite(static_triangle([m1, m2, m3], tol)));
    }

    let p = [p1, p2, p3];
    let m = [m1, m2, m3];
    let prefer_reduction = matches!(
        tag,
        ClassificationTag::PairwiseDegenerate | ClassificationTag::FullyDegenerate
    );
    if prefer_reduction && config.log_level.warns() {
        tracing::warn!(
            gram = gram3(p1, p2, p3).norm(),
            "degenerate triangle kinematics: using bubble reduction with reduced accuracy"
        );
    }
    if let Some(result) = eval_branches(p, m, prefer_reduction, mu2, scale, tol, config) {
        return Ok(result);
    }

    // Exactly coincident propagator pairs leave both the shear and the
    // kinematic matrix degenerate. Split the degeneracy symmetrically and
    // average the two evaluations; the linear terms of the expansion cancel.
    if config.log_level.warns() {
        tracing::warn!(
            "coincident triangle propagators: averaging symmetrically split evaluations"
        );
    }
    let delta = 1e-7 * scale;
    let split = |sign: f64| -> Option<LaurentSeries> {
        let shifted = [
            p[0] + Complex64::new(sign * delta, 0.0),
            p[1] + Complex64::new(2.0 * sign * delta, 0.0),
            p[2] + Complex64::new(3.0 * sign * delta, 0.0),
        ];
        eval_branches(shifted, m, false, mu2, scale, tol, config)
    };
    match (split(1.0), split(-1.0)) {
        (Some(a), Some(b)) => Ok(a.add(&b).scaled(Complex64::new(0.5, 0.0))),
        // One-sided expansion: first-order error in the split survives.
        (Some(a), None) | (None, Some(a)) => Ok(a),
        (None, None) => Err(Error::Domain(
            "degenerate triangle point admits no stable branch formula".into(),
        )),
    }
}

/// Try the closed-form branches in preference order: the dilogarithmic core
/// (on the point and its cyclic relabelings) and the bubble reduction.
fn eval_branches(
    p: [Complex64; 3],
    m: [Complex64; 3],
    prefer_reduction: bool,
    mu2: Complex64,
    scale: f64,
    tol: f64,
    config: &Config,
) -> Option<LaurentSeries> {
    let direct = || {
        let [p1, p2, p3] = p;
        let [m1, m2, m3] = m;
        let relabelings = [
            ([p1, p2, p3], [m1, m2, m3]),
            ([p2, p3, p1], [m2, m3, m1]),
            ([p3, p1, p2], [m3, m1, m2]),
        ];
        relabelings
            .into_iter()
            .find_map(|(p, m)| dilog_core(p, m, tol))
            .map(LaurentSeries::finite)
    };
    let reduce = || reduction_branch(p, m, mu2, scale, tol, config);
    if prefer_reduction {
        reduce().or_else(direct)
    } else {
        direct().or_else(reduce)
    }
}

/// Evaluate the 3-point (triangle) function, applying the configured
/// normalization convention.
pub fn evaluate(
    p1: Complex64,
    p2: Complex64,
    p3: Complex64,
    m1: Complex64,
    m2: Complex64,
    m3: Complex64,
    config: &Config,
) -> Result<LaurentSeries> {
    check_causal_masses(&[m1, m2, m3])?;
    Ok(c0(p1, p2, p3, m1, m2, m3, config)?.scaled(config.unit_convention.factor().into()))
}

/// Triangles with all internal lines massless, in closed form. The pole
/// structure depends on how many external invariants are off shell.
fn massless_family(
    p: [Complex64; 3],
    tol: f64,
    mu2: Complex64,
    scale: f64,
    config: &Config,
) -> Result<LaurentSeries> {
    let offshell: Vec<Complex64> = p.iter().copied().filter(|s| s.norm() > tol).collect();
    match offshell.len() {
        0 => Err(Error::SingularConfiguration(
            "triangle with all invariants and masses vanishing has no regularized value".into(),
        )),
        1 => {
            // C0(0, 0, s; 0, 0, 0) = (μ²/−s)^ε / (s ε²).
            let s = offshell[0];
            let l = cln(-s / mu2);
            Ok(LaurentSeries::new(
                0.5 * l * l / s,
                -l / s,
                Complex64::new(1.0, 0.0) / s,
            ))
        }
        2 => {
            // C0(0, s1, s2; 0, 0, 0) = [(μ²/−s1)^ε − (μ²/−s2)^ε] / (ε²(s1−s2)).
            let (s1, s2) = (offshell[0], offshell[1]);
            if (s1 - s2).norm() <= tol {
                let s = 0.5 * (s1 + s2);
                let l = cln(-s / mu2);
                Ok(LaurentSeries::new(
                    l / s,
                    -Complex64::new(1.0, 0.0) / s,
                    Complex64::default(),
                ))
            } else {
                let l1 = cln(-s1 / mu2);
                let l2 = cln(-s2 / mu2);
                Ok(LaurentSeries::new(
                    0.5 * (l1 * l1 - l2 * l2) / (s1 - s2),
                    (l2 - l1) / (s1 - s2),
                    Complex64::default(),
                ))
            }
        }
        _ => {
            // All legs off shell: finite. The generic core applies with
            // vanishing internal masses; where no real shear exists the
            // bubble reduction takes over (its pole and scale terms cancel
            // exactly for this family as well).
            let zero = Complex64::default();
            let masses = [zero, zero, zero];
            dilog_core(p, masses, tol)
                .map(LaurentSeries::finite)
                .or_else(|| reduction_branch(p, masses, mu2, scale, tol, config))
                .ok_or_else(|| {
                    Error::Domain(
                        "massless triangle with three off-shell legs outside the supported region"
                            .into(),
                    )
                })
        }
    }
}

/// Mixed-mass infrared divergences the massive branches do not continue:
/// a massless internal line whose two adjacent invariants both sit on the
/// masses at its far ends (soft singularity), and a pair of massless lines
/// joined by a light-like invariant (scaleless sub-bubble).
fn check_ir_regulated(p: [Complex64; 3], m: [Complex64; 3], tol: f64) -> Result<()> {
    let [p1, p2, p3] = p;
    let [m1, m2, m3] = m;
    let soft = [
        (m1, p1, m2, p3, m3),
        (m2, p1, m1, p2, m3),
        (m3, p2, m2, p3, m1),
    ];
    for (mass, qa, ma, qb, mb) in soft {
        if mass.norm() <= tol && (qa - ma).norm() <= tol && (qb - mb).norm() <= tol {
            return Err(Error::Domain(
                "infrared-divergent triangle (massless line with both ends on shell) is outside \
                 the supported analytic-continuation region"
                    .into(),
            ));
        }
    }
    let collinear = [(m1, m2, p1), (m2, m3, p2), (m1, m3, p3)];
    for (ma, mb, q) in collinear {
        if ma.norm() <= tol && mb.norm() <= tol && q.norm() <= tol {
            return Err(Error::Domain(
                "infrared-divergent triangle (massless line pair with light-like invariant) is \
                 outside the supported analytic-continuation region"
                    .into(),
            ));
        }
    }
    Ok(())
}

/// Degenerate branch: reduce to the three pinched bubbles with weights from
/// the inverse kinematic matrix, plus the six-dimensional-triangle term that
/// restores exact pole cancellation and μ-independence. Returns `None` when
/// the kinematic matrix is singular or a pinched bubble is itself singular.
fn reduction_branch(
    p: [Complex64; 3],
    m: [Complex64; 3],
    mu2: Complex64,
    scale: f64,
    tol: f64,
    config: &Config,
) -> Option<LaurentSeries> {
    let [p1, p2, p3] = p;
    let [m1, m2, m3] = m;
    let matrix = KinematicMatrix::triangle(p, m);
    let reduction = matrix.reduction_weights()?;

    // Pinching line i leaves the bubble of the two remaining lines.
    let pinches = [(p2, m2, m3), (p3, m1, m3), (p1, m1, m2)];
    let mut sum = LaurentSeries::zero();
    for (weight, (q, ma, mb)) in reduction.weights.iter().zip(pinches) {
        let bubble = b0(q, ma, mb, config).ok()?;
        sum = sum.add(&bubble.scaled(*weight));
    }

    // Six-dimensional triangle counterterm, modeled by its UV pole and
    // scale-restoring log around the mean internal mass: the bubbles carry
    // b₀/ε, so the counterterm −b₀(1/ε + ln(μ²/m̄²)) cancels the pole and
    // the μ-dependence exactly; the detG-suppressed finite remainder is
    // dropped in this branch.
    let mean_mass = (m1 + m2 + m3) / 3.0;
    let reference = if mean_mass.norm() > tol {
        mean_mass
    } else {
        Complex64::new(scale, 0.0)
    };
    let tri6 = LaurentSeries::new(
        cln(mu2 / reference),
        Complex64::new(1.0, 0.0),
        Complex64::default(),
    );
    Some(sum.add(&tri6.scaled(-reduction.weight_sum)))
}

/// Triangle at vanishing external momenta: the parameter integral is a
/// rational-logarithmic function of the masses alone.
///
/// With `φ(a, b) = (a ln a − b ln b)/(a − b) − 1`,
/// `C0(0,0,0; m1², m2², m3²) = −(φ(m3², m1²) − φ(m2², m1²))/(m3² − m2²)`.
fn static_triangle(m: [Complex64; 3], tol: f64) -> Complex64 {
    let [m1, m2, m3] = m;
    if (m3 - m2).norm() <= tol {
        let mb = 0.5 * (m2 + m3);
        if (mb - m1).norm() <= tol {
            // Fully equal masses: −1/(2m²).
            let mavg = (m1 + m2 + m3) / 3.0;
            return -0.5 / mavg;
        }
        // ∂φ(x, m1)/∂x at x = m̄.
        return -phi_prime(mb, m1, tol);
    }
    -(phi(m3, m1, tol) - phi(m2, m1, tol)) / (m3 - m2)
}

/// `φ(a, b) = (a ln a − b ln b)/(a − b) − 1`, with its analytic limits at
/// coincident and vanishing arguments.
fn phi(a: Complex64, b: Complex64, tol: f64) -> Complex64 {
    let one = Complex64::new(1.0, 0.0);
    if b.norm() <= tol {
        return cln(a) - one;
    }
    if a.norm() <= tol {
        return cln(b) - one;
    }
    if (a - b).norm() <= tol {
        return cln(0.5 * (a + b));
    }
    (a * cln(a) - b * cln(b)) / (a - b) - one
}

/// `∂φ(x, b)/∂x = [(ln x + 1)(x − b) − (x ln x − b ln b)]/(x − b)²`.
fn phi_prime(x: Complex64, b: Complex64, tol: f64) -> Complex64 {
    let one = Complex64::new(1.0, 0.0);
    if b.norm() <= tol {
        return one / x;
    }
    let diff = x - b;
    ((cln(x) + one) * diff - (x * cln(x) - b * cln(b))) / (diff * diff)
}

fn sign_of(x: f64) -> f64 {
    if x >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Leading coefficient and `−i0`-continued roots of
/// `g(y) = a·y² + b·y + c`. Double real roots are split symmetrically so
/// the factor logs recombine to the real value of `ln g`.
fn factorize(a: Complex64, b: Complex64, c: Complex64) -> (Complex64, Vec<Complex64>) {
    // Only exact zeros force the lower-degree paths; the stable quadratic
    // solver already handles small leading coefficients.
    if a == Complex64::default() {
        if b == Complex64::default() {
            return (c, vec![]);
        }
        let mut z = -c / b;
        if z.im == 0.0 {
            z += Complex64::new(0.0, ROOT_SHIFT * sign_of(b.re));
        }
        return (b, vec![z]);
    }
    let (r1, r2) = quadratic_roots(a, b, c);
    let mut roots = [r1, r2];
    if roots.iter().all(|z| z.im == 0.0) {
        // g'(r1) = a(r1 − r2): shift each root by i·0⁺/g'.
        let slope = (a * (r1 - r2)).re;
        if slope != 0.0 {
            roots[0] += Complex64::new(0.0, ROOT_SHIFT * sign_of(slope));
            roots[1] -= Complex64::new(0.0, ROOT_SHIFT * sign_of(slope));
        } else {
            roots[0] += Complex64::new(0.0, ROOT_SHIFT);
            roots[1] -= Complex64::new(0.0, ROOT_SHIFT);
        }
    }
    (a, roots.to_vec())
}

/// `R(y₀, z) = Li₂(y₀/(y₀−z)) − Li₂((y₀−1)/(y₀−z))`, the closed form of
/// `∫₀¹ dy ln(1 + (y−y₀)/(y₀−z))/(y−y₀)`.
fn r_function(y0: Complex64, z: Complex64) -> Complex64 {
    let denom = y0 - z;
    dilog(y0 / denom) - dilog((y0 - 1.0) / denom)
}

/// `∫₀¹ dy/(y−y₀)` for y₀ off the integration path.
fn path_log(y0: Complex64) -> Complex64 {
    cln(1.0 - y0) - cln(-y0)
}

/// Keep a pole strictly off the integration path.
fn nudge_off_path(y0: Complex64) -> Complex64 {
    if y0.im == 0.0 && y0.re > 0.0 && y0.re < 1.0 {
        y0 - Complex64::new(0.0, POLE_SHIFT)
    } else {
        y0
    }
}

fn eval_quadratic(g: (Complex64, Complex64, Complex64), y: Complex64) -> Complex64 {
    (g.0 * y + g.1) * y + g.2
}

/// `S(g, y₀) = ∫₀¹ dy cln(g(y))/(y−y₀)`, evaluated through the factor
/// decomposition with explicit branch alignment:
/// each factor contributes an R-function plus its path-consistent log times
/// `∫ dy/(y−y₀)`, and a probe on the path fixes the 2πi windings between the
/// product log and the factor logs.
fn edge_integral(g: (Complex64, Complex64, Complex64), y0: Complex64) -> Complex64 {
    let two_pi = 2.0 * PI;
    let (kappa, roots) = factorize(g.0, g.1, g.2);
    if kappa == Complex64::default() {
        return Complex64::default();
    }

    // Probe point on the path where g does not vanish.
    let probe = [0.5, 0.421875, 0.640625]
        .into_iter()
        .map(|x| Complex64::new(x, 0.0))
        .find(|&x| eval_quadratic(g, x).norm() > 0.0);
    let Some(yp) = probe else {
        return Complex64::default();
    };

    let plog = path_log(y0);
    let mut total = Complex64::default();
    let mut factor_logs = cln(kappa);
    let mut probe_logs = cln(kappa);
    for z in roots {
        let c = y0 - z;
        total += r_function(y0, z);
        // Path-consistent branch of ln(y₀−z): correct the principal value by
        // the winding picked up when continuing from the path to y₀.
        let theta = cln(yp - z) - cln(c) - cln(1.0 + (yp - y0) / c);
        let winding = (theta.im / two_pi).round();
        factor_logs += cln(c) + Complex64::new(0.0, winding * two_pi);
        probe_logs += cln(yp - z);
    }
    // Winding between the product log and the factor-log sum on the path.
    let mismatch = cln(eval_quadratic(g, yp)) - probe_logs;
    let nbar = (mismatch.im / two_pi).round();
    factor_logs += Complex64::new(0.0, nbar * two_pi);

    total + factor_logs * plog
}

/// Generic finite triangle via the 't Hooft–Veltman edge decomposition.
///
/// The double Feynman-parameter integral `−∫₀¹dx∫₀ˣdy Δ(x,y)⁻¹` with
/// `Δ = A x² + B y² + C xy + D x + E y + F − i0` is sheared by `y → y + αx`
/// (α a root of `Bα² + Cα + A = 0`, real whenever λ(p1,p2,p3) ≥ 0), making
/// Δ linear in x; integrating x out leaves one integral along each edge of
/// the parameter triangle:
///
/// `C0 = [−S(g₁,y₀+α) + S(g₃,y₀/(1−α)) − S(g₂,−y₀/α)] / (2Bα+C)`
///
/// with the same sign pattern for every real α. Returns `None` when no real
/// shear exists (λ < 0 or complex invariants) or a substitution degenerates;
/// the caller retries relabelings and falls back to the bubble reduction.
fn dilog_core(p: [Complex64; 3], m: [Complex64; 3], tol: f64) -> Option<Complex64> {
    let [p1, p2, p3] = p;
    let [m1, m2, m3] = m;
    let a = p1;
    let b = p2;
    let c = p3 - p1 - p2;
    let d = m2 - m1 - p1;
    let e = m3 - m2 - p3 + p1;
    let f = m1;

    if a.norm() <= tol && b.norm() <= tol {
        return two_lightlike_core(c, d, e, f, tol);
    }

    // Shear parameter: a root of Bα² + Cα + A = 0 away from 0 and 1, so all
    // three edge substitutions stay regular.
    let candidates: Vec<(Complex64, Complex64)> = if b.norm() > tol {
        let (r1, r2) = quadratic_roots(b, c, a);
        // denom = 2Bα + C evaluates to ∓√(C²−4AB) at the two roots.
        vec![(r1, 2.0 * b * r1 + c), (r2, 2.0 * b * r2 + c)]
    } else if c.norm() > tol {
        vec![(-a / c, c)]
    } else {
        return None;
    };
    let (alpha, denom) = candidates.into_iter().find(|&(alpha, denom)| {
        alpha.im.abs() <= 1e-12 * alpha.norm().max(1.0)
            && alpha.norm() > 1e-10
            && (alpha - 1.0).norm() > 1e-10
            && denom.norm() > tol
    })?;
    let alpha = Complex64::new(alpha.re, 0.0);

    let y0 = nudge_off_path(-(d + e * alpha) / denom);
    let y01 = nudge_off_path(y0 + alpha);
    let y02 = nudge_off_path(y0 / (1.0 - alpha));
    let y03 = nudge_off_path(-y0 / alpha);

    // Edge quadratics of Δ: x = 1, the diagonal y = x, and y = 0.
    let g1 = (b, c + e, a + d + f);
    let g3 = (a + b + c, d + e, f);
    let g2 = (a, d, f);

    let total =
        (-edge_integral(g1, y01) + edge_integral(g3, y02) - edge_integral(g2, y03)) / denom;
    if total.re.is_finite() && total.im.is_finite() {
        Some(total)
    } else {
        None
    }
}

/// Triangles with two light-like legs (`p1 ≈ p2 ≈ 0`): Δ loses both
/// quadratic terms, the inner integral is elementary, and a single edge pair
/// remains:
///
/// `C0 = −[S(Δ(x,x), x*) − S(Δ(x,0), x*)] / C`,  `x* = −E/C`.
fn two_lightlike_core(
    c: Complex64,
    d: Complex64,
    e: Complex64,
    f: Complex64,
    tol: f64,
) -> Option<Complex64> {
    if c.norm() <= tol {
        return None;
    }
    let x_pole = nudge_off_path(-e / c);
    let g_diag = (c, d + e, f);
    let g_line = (Complex64::default(), d, f);
    let total = -(edge_integral(g_diag, x_pole) - edge_integral(g_line, x_pole)) / c;
    if total.re.is_finite() && total.im.is_finite() {
        Some(total)
    } else {
        None
    }
}
