use num_complex::Complex64;

use crate::config::Config;
use crate::reduction::{gram3, gram4};
use crate::types::KinematicPoint;

/// Discrete kinematic regime of a point, produced fresh per call and never
/// persisted. Closed-form one-loop formulas contain subtractions that become
/// 0/0 at coincident masses or momenta; the tag routes each engine to a
/// limiting formula instead of cancelling large nearly-equal terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationTag {
    /// No degeneracy: the closed-form generic branch is numerically safe.
    Generic,
    /// Two invariant/mass pairs coincide, or the Gram-type determinant is
    /// within threshold of zero: reduction / expansion formulas apply.
    PairwiseDegenerate,
    /// All internal masses coincide.
    FullyDegenerate,
    /// At least one external invariant or internal mass is within threshold
    /// of zero (light-like leg or massless line) in an otherwise massive
    /// configuration.
    LightLike,
    /// Every internal mass vanishes: the infrared family of formulas with
    /// explicit ε-poles applies.
    IrSingular,
}

fn near_zero(z: Complex64, tol: f64) -> bool {
    z.norm() <= tol
}

fn near(a: Complex64, b: Complex64, tol: f64) -> bool {
    (a - b).norm() <= tol
}

/// Classify a kinematic point against the configured on-shell threshold.
/// Comparisons are relative to the point's representative scale; the most
/// specific matching tag wins.
pub fn classify(point: &KinematicPoint, config: &Config) -> ClassificationTag {
    let scale = point.scale();
    let tol = config.tolerance_at(scale);

    match *point {
        KinematicPoint::OnePoint { m } => {
            if near_zero(m, tol) {
                ClassificationTag::LightLike
            } else {
                ClassificationTag::Generic
            }
        }

        KinematicPoint::TwoPoint { p, m1, m2 } => {
            let p0 = near_zero(p, tol);
            let m1z = near_zero(m1, tol);
            let m2z = near_zero(m2, tol);
            if p0 && m1z && m2z {
                // Scaleless massless bubble.
                ClassificationTag::IrSingular
            } else if p0 && near(m1, m2, tol) {
                ClassificationTag::FullyDegenerate
            } else if p0 || m1z || m2z {
                ClassificationTag::LightLike
            } else if near(m1, m2, tol) {
                ClassificationTag::PairwiseDegenerate
            } else {
                ClassificationTag::Generic
            }
        }

        KinematicPoint::ThreePoint {
            p1,
            p2,
            p3,
            m1,
            m2,
            m3,
        } => {
            let masses_zero = near_zero(m1, tol) && near_zero(m2, tol) && near_zero(m3, tol);
            if masses_zero {
                return ClassificationTag::IrSingular;
            }
            if near(m1, m2, tol) && near(m2, m3, tol) {
                return ClassificationTag::FullyDegenerate;
            }
            // Gram-type degeneracy: the triangle's two independent momenta
            // become linearly dependent when λ(p1, p2, p3) vanishes.
            let gram = gram3(p1, p2, p3);
            let pairs_coincide = (near(p1, p2, tol) && near(m1, m2, tol))
                || (near(p2, p3, tol) && near(m2, m3, tol))
                || (near(p1, p3, tol) && near(m1, m3, tol));
            if gram.norm() <= tol * scale || pairs_coincide {
                return ClassificationTag::PairwiseDegenerate;
            }
            let any_light = near_zero(p1, tol)
                || near_zero(p2, tol)
                || near_zero(p3, tol)
                || near_zero(m1, tol)
                || near_zero(m2, tol)
                || near_zero(m3, tol);
            if any_light {
                ClassificationTag::LightLike
            } else {
                ClassificationTag::Generic
            }
        }

        KinematicPoint::FourPoint {
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
        } => {
            let masses_zero = near_zero(m1, tol)
                && near_zero(m2, tol)
                && near_zero(m3, tol)
                && near_zero(m4, tol);
            if masses_zero {
                return ClassificationTag::IrSingular;
            }
            if gram4(p1, p2, p3, p4, p12, p23).norm() <= tol * scale * scale {
                return ClassificationTag::PairwiseDegenerate;
            }
            if near(m1, m2, tol) && near(m2, m3, tol) && near(m3, m4, tol) {
                return ClassificationTag::FullyDegenerate;
            }
            let any_light = [p1, p2, p3, p4, p12, p23, m1, m2, m3, m4]
                .iter()
                .any(|z| near_zero(*z, tol));
            if any_light {
                ClassificationTag::LightLike
            } else {
                ClassificationTag::Generic
            }
        }
    }
}
