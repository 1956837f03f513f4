use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

use crate::special::kallen;

/// Kinematic matrix of a loop topology, `S_ij = q_ij² − m_i² − m_j²`, where
/// `q_ij` is the invariant of the momentum flowing between internal lines
/// `i` and `j` (so the diagonal is `−2m_i²`). The solution of `S·b = 1`
/// supplies the weights that reduce an N-point integral to its pinched
/// (N−1)-point integrals.
#[derive(Debug, Clone)]
pub struct KinematicMatrix {
    matrix: DMatrix<Complex64>,
}

/// Reduction data derived from the inverse kinematic matrix: the weight
/// vector `b = S⁻¹·1` and its sum `b₀ = 1ᵀS⁻¹1`.
#[derive(Debug, Clone)]
pub struct ReductionWeights {
    pub weights: Vec<Complex64>,
    pub weight_sum: Complex64,
}

impl KinematicMatrix {
    /// Triangle matrix from external invariants (p1, p2, p3) and internal
    /// mass-squared values (m1, m2, m3). Line pairs map to invariants as
    /// (1,2) → p1, (2,3) → p2, (1,3) → p3.
    pub fn triangle(p: [Complex64; 3], m: [Complex64; 3]) -> Self {
        let [p1, p2, p3] = p;
        let [m1, m2, m3] = m;
        let matrix = DMatrix::from_row_slice(
            3,
            3,
            &[
                -2.0 * m1,
                p1 - m1 - m2,
                p3 - m1 - m3,
                p1 - m1 - m2,
                -2.0 * m2,
                p2 - m2 - m3,
                p3 - m1 - m3,
                p2 - m2 - m3,
                -2.0 * m3,
            ],
        );
        Self { matrix }
    }

    /// Box matrix from the six external invariants and four internal masses.
    /// Line pairs map as (1,2) → p1, (2,3) → p2, (3,4) → p3, (1,4) → p4,
    /// (1,3) → p12, (2,4) → p23.
    #[allow(clippy::too_many_arguments)]
    pub fn bx(
        p1: Complex64,
        p2: Complex64,
        p3: Complex64,
        p4: Complex64,
        p12: Complex64,
        p23: Complex64,
        m: [Complex64; 4],
    ) -> Self {
        let [m1, m2, m3, m4] = m;
        let matrix = DMatrix::from_row_slice(
            4,
            4,
            &[
                -2.0 * m1,
                p1 - m1 - m2,
                p12 - m1 - m3,
                p4 - m1 - m4,
                p1 - m1 - m2,
                -2.0 * m2,
                p2 - m2 - m3,
                p23 - m2 - m4,
                p12 - m1 - m3,
                p2 - m2 - m3,
                -2.0 * m3,
                p3 - m3 - m4,
                p4 - m1 - m4,
                p23 - m2 - m4,
                p3 - m3 - m4,
                -2.0 * m4,
            ],
        );
        Self { matrix }
    }

    pub fn dimension(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn determinant(&self) -> Complex64 {
        self.matrix.clone().lu().determinant()
    }

    /// Solve `S·b = (1, …, 1)ᵀ` for the reduction weights. Returns `None`
    /// when the matrix is singular to working precision; callers treat that
    /// as a degenerate configuration and dispatch accordingly.
    pub fn reduction_weights(&self) -> Option<ReductionWeights> {
        let n = self.dimension();
        let lu = self.matrix.clone().lu();
        // LU pivots rarely hit exact zero in floating point; reject
        // near-singular matrices by determinant magnitude relative to the
        // entry scale instead.
        let entry_scale = self
            .matrix
            .iter()
            .map(|z| z.norm())
            .fold(0.0_f64, f64::max)
            .max(f64::MIN_POSITIVE);
        let det = lu.determinant();
        if det.norm() <= 1e-12 * entry_scale.powi(n as i32) {
            return None;
        }
        let rhs = DVector::from_element(n, Complex64::new(1.0, 0.0));
        let solved = lu.solve(&rhs)?;
        let weights: Vec<Complex64> = solved.iter().copied().collect();
        if weights.iter().any(|w| !w.re.is_finite() || !w.im.is_finite()) {
            return None;
        }
        let weight_sum = weights.iter().copied().sum();
        Some(ReductionWeights {
            weights,
            weight_sum,
        })
    }
}

/// Gram indicator of the triangle: the two independent momenta become
/// linearly dependent exactly when λ(p1, p2, p3) vanishes
/// (det G = −λ/2 up to normalization).
pub fn gram3(p1: Complex64, p2: Complex64, p3: Complex64) -> Complex64 {
    kallen(p1, p2, p3)
}

/// Gram determinant of the box's three independent momenta (q₁, q₁₂, q₁₂₃),
/// expressed through the external invariants:
/// `q1² = p1, q12² = p12, q123² = p4, (q12−q1)² = p2, (q123−q12)² = p3,
/// (q123−q1)² = p23`.
pub fn gram4(
    p1: Complex64,
    p2: Complex64,
    p3: Complex64,
    p4: Complex64,
    p12: Complex64,
    p23: Complex64,
) -> Complex64 {
    let g11 = 2.0 * p1;
    let g22 = 2.0 * p12;
    let g33 = 2.0 * p4;
    let g12 = p1 + p12 - p2;
    let g13 = p1 + p4 - p23;
    let g23 = p12 + p4 - p3;
    g11 * (g22 * g33 - g23 * g23) - g12 * (g12 * g33 - g23 * g13)
        + g13 * (g12 * g23 - g22 * g13)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64) -> Complex64 {
        Complex64::new(x, 0.0)
    }

    #[test]
    fn triangle_matrix_is_symmetric() {
        let s = KinematicMatrix::triangle([c(0.1), c(0.2), c(0.3)], [c(1.0), c(2.0), c(3.0)]);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(s.matrix[(i, j)], s.matrix[(j, i)]);
            }
        }
        assert_eq!(s.matrix[(0, 0)], c(-2.0));
        assert_eq!(s.matrix[(0, 1)], c(0.1 - 1.0 - 2.0));
    }

    #[test]
    fn weights_solve_the_unit_system() {
        let s = KinematicMatrix::triangle(
            [c(0.01), c(0.01), c(0.001)],
            [c(0.02), c(0.02), c(0.02)],
        );
        let r = s.reduction_weights().expect("matrix is regular");
        for i in 0..3 {
            let mut acc = Complex64::default();
            for j in 0..3 {
                acc += s.matrix[(i, j)] * r.weights[j];
            }
            assert!((acc - c(1.0)).norm() < 1e-10, "row {i}: {acc}");
        }
        let direct_sum: Complex64 = r.weights.iter().copied().sum();
        assert!((direct_sum - r.weight_sum).norm() < 1e-14);
    }

    #[test]
    fn massless_on_shell_box_weights() {
        // For the fully massless box with only p12 = s and p23 = t nonzero,
        // S·b = 1 solves to b = (1/s, 1/t, 1/s, 1/t).
        let (s, t) = (2.0, -0.5);
        let zero = c(0.0);
        let m = [zero; 4];
        let sm = KinematicMatrix::bx(zero, zero, zero, zero, c(s), c(t), m);
        let r = sm.reduction_weights().expect("regular");
        assert!((r.weights[0] - c(1.0 / s)).norm() < 1e-12);
        assert!((r.weights[1] - c(1.0 / t)).norm() < 1e-12);
        assert!((r.weights[2] - c(1.0 / s)).norm() < 1e-12);
        assert!((r.weights[3] - c(1.0 / t)).norm() < 1e-12);
    }

    #[test]
    fn singular_matrix_yields_no_weights() {
        // Two identical lines: rows 1 and 2 coincide.
        let s = KinematicMatrix::triangle([c(0.0), c(0.5), c(0.5)], [c(1.0), c(1.0), c(2.0)]);
        assert!(s.reduction_weights().is_none());
    }

    #[test]
    fn box_determinant_matches_generic_determinant() {
        let s = KinematicMatrix::bx(
            c(0.1),
            c(0.2),
            c(0.3),
            c(0.4),
            c(0.5),
            c(0.6),
            [c(1.0), c(2.0), c(3.0), c(4.0)],
        );
        let det = s.determinant();
        let direct = s.matrix.determinant();
        assert!((det - direct).norm() < 1e-9 * direct.norm().max(1.0));
    }

    #[test]
    fn gram4_vanishes_for_dependent_momenta() {
        // p2 = 0 with p12 = p1 and consistent p23 means q12 = q1: rank drop.
        let g = gram4(c(1.0), c(0.0), c(0.0), c(4.0), c(1.0), c(0.0));
        assert!(g.norm() < 1e-12, "gram = {g}");
    }
}
