use num_complex::Complex64;

use crate::classify::{classify, ClassificationTag};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::reduction::{gram4, KinematicMatrix};
use crate::three_point::c0;
use crate::types::{check_causal_masses, KinematicPoint, LaurentSeries};

/// Coefficient of the modeled six-dimensional box in the dimension-shift
/// remainder.
const BOX6_COEFF: f64 = -2.0 / 3.0;

/// The four pinched triangles of a box: removing internal line `i` leaves
/// the triangle of the remaining three lines, with invariants read off the
/// surviving line pairs.
#[allow(clippy::too_many_arguments)]
pub(crate) fn pinched_triangles(
    p1: Complex64,
    p2: Complex64,
    p3: Complex64,
    p4: Complex64,
    p12: Complex64,
    p23: Complex64,
    m1: Complex64,
    m2: Complex64,
    m3: Complex64,
    m4: Complex64,
) -> [[Complex64; 6]; 4] {
    [
        [p2, p3, p23, m2, m3, m4],
        [p12, p3, p4, m1, m3, m4],
        [p1, p23, p4, m1, m2, m4],
        [p1, p2, p12, m1, m2, m3],
    ]
}

/// Raw box in the internal normalization, via the dimension-shift reduction
///
/// `D0 = Σᵢ bᵢ·C0⁽ⁱ⁾ + R`,
///
/// with weights `b = S⁻¹·1` from the kinematic matrix and `R` the finite
/// rational remainder modeling the six-dimensional box,
/// `R = −⅔·b₀·detG/detS`. Near-vanishing Gram determinants truncate `R` to
/// zero, which is the exact small-Gram limit of the identity. Repeated
/// sub-kinematics among the four pinches are evaluated once.
#[allow(clippy::too_many_arguments)]
pub(crate) fn d0(
    p1: Complex64,
    p2: Complex64,
    p3: Complex64,
    p4: Complex64,
    p12: Complex64,
    p23: Complex64,
    m1: Complex64,
    m2: Complex64,
    m3: Complex64,
    m4: Complex64,
    config: &Config,
) -> Result<LaurentSeries> {
    let point = KinematicPoint::FourPoint {
        p1,
        p2,
        p3,
        p4,
        p12,
        p23,
        m1,
        m2,
        m3,
        m4,
    };
    let tag = classify(&point, config);
    if config.log_level.traces() {
        tracing::debug!(?tag, "box branch");
    }
    let scale = point.scale();
    let tol = config.tolerance_at(scale);

    if point.entries().iter().all(|z| z.norm() <= tol) {
        return Err(Error::SingularConfiguration(
            "box with all invariants and masses vanishing has no regularized value".into(),
        ));
    }

    let matrix = KinematicMatrix::bx(p1, p2, p3, p4, p12, p23, [m1, m2, m3, m4]);
    let reduction = matrix.reduction_weights().ok_or_else(|| {
        Error::Domain(
            "box kinematic matrix is singular: no stable reduction at this point".into(),
        )
    })?;

    let pinches = pinched_triangles(p1, p2, p3, p4, p12, p23, m1, m2, m3, m4);
    let mut memo: Vec<([Complex64; 6], LaurentSeries)> = Vec::with_capacity(4);
    let mut sum = LaurentSeries::zero();
    for (weight, args) in reduction.weights.iter().zip(pinches) {
        let triangle = match memo.iter().find(|(key, _)| *key == args) {
            Some((_, cached)) => *cached,
            None => {
                let value = c0(args[0], args[1], args[2], args[3], args[4], args[5], config)
                    .map_err(|err| match err {
                        Error::SingularConfiguration(_) => Error::Domain(
                            "box reduction pinches onto a scaleless triangle: \
                             infrared-divergent point outside the supported region"
                                .into(),
                        ),
                        other => other,
                    })?;
                memo.push((args, value));
                value
            }
        };
        sum = sum.add(&triangle.scaled(*weight));
    }

    let gram = gram4(p1, p2, p3, p4, p12, p23);
    let degenerate = tag == ClassificationTag::PairwiseDegenerate
        || gram.norm() <= tol * scale * scale;
    let remainder = if degenerate {
        if config.log_level.warns() {
            tracing::warn!(
                gram = gram.norm(),
                "degenerate box Gram determinant: truncating the dimension-shift remainder"
            );
        }
        Complex64::default()
    } else {
        let det = matrix.determinant();
        if det.norm() == 0.0 {
            Complex64::default()
        } else {
            BOX6_COEFF * reduction.weight_sum * gram / det
        }
    };

    Ok(sum.add(&LaurentSeries::finite(remainder)))
}

/// Evaluate the 4-point (box) function, applying the configured
/// normalization convention. This is the deepest recursive composition:
/// box → triangle → bubble → tadpole, each layer consumed through its
/// public contract.
#[allow(clippy::too_many_arguments)]
pub fn evaluate(
    p1: Complex64,
    p2: Complex64,
    p3: Complex64,
    p4: Complex64,
    p12: Complex64,
    p23: Complex64,
    m1: Complex64,
    m2: Complex64,
    m3: Complex64,
    m4: Complex64,
    config: &Config,
) -> Result<LaurentSeries> {
    check_causal_masses(&[m1, m2, m3, m4])?;
    Ok(
        d0(p1, p2, p3, p4, p12, p23, m1, m2, m3, m4, config)?
            .scaled(config.unit_convention.factor().into()),
    )
}
