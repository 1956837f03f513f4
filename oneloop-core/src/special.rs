use num_complex::Complex64;
use std::f64::consts::PI;

/// Complex logarithm, principal branch, with arguments on the negative real
/// axis resolved as approached from below (`Im → 0⁻`). This matches the
/// `m² − i0` Feynman prescription: a squared mass or invariant that has been
/// continued to the negative real axis picks up `−iπ`, not `+iπ`.
///
/// The argument must be nonzero; callers branch away from vanishing
/// arguments before taking logarithms.
pub fn cln(z: Complex64) -> Complex64 {
    if z.im == 0.0 && z.re < 0.0 {
        Complex64::new((-z.re).ln(), -PI)
    } else {
        z.ln()
    }
}

/// Complex square root continued consistently with the `−i0` prescription:
/// negative real arguments map to the negative imaginary axis.
pub fn csqrt(z: Complex64) -> Complex64 {
    if z.im == 0.0 && z.re < 0.0 {
        Complex64::new(0.0, -((-z.re).sqrt()))
    } else {
        z.sqrt()
    }
}

/// Källén triangle function λ(a, b, c) = a² + b² + c² − 2ab − 2bc − 2ca.
pub fn kallen(a: Complex64, b: Complex64, c: Complex64) -> Complex64 {
    a * a + b * b + c * c - 2.0 * (a * b + b * c + c * a)
}

/// Roots of `a·y² + b·y + c = 0`, computed in the numerically stable form
/// that avoids subtracting nearly equal quantities. The leading coefficient
/// must be nonzero; degenerate quadratics are dispatched away by the engines
/// before root-finding.
pub fn quadratic_roots(a: Complex64, b: Complex64, c: Complex64) -> (Complex64, Complex64) {
    let mut sq = csqrt(b * b - 4.0 * a * c);
    // Align the square root with b so b + sq does not cancel.
    if (b.conj() * sq).re < 0.0 {
        sq = -sq;
    }
    let q = -0.5 * (b + sq);
    if q == Complex64::default() {
        // b = 0 with sq = 0 (double root at the origin) or fully degenerate.
        let root = csqrt(-c / a);
        return (root, -root);
    }
    (q / a, c / q)
}

// Bernoulli-series coefficients B_{2k}/(2k+1)! for the dilogarithm in
// u = -ln(1-z). Convergent for |u| < 2π; the argument reduction below keeps
// |u| under ~1.3 so ten terms reach full double precision.
const DILOG_SERIES: [f64; 10] = [
    2.777_777_777_777_778e-2,
    -2.777_777_777_777_778e-4,
    4.724_111_866_969_010e-6,
    -9.185_773_074_661_963e-8,
    1.897_886_998_897_100e-9,
    -4.064_761_645_144_226e-11,
    8.921_691_020_456_453e-13,
    -1.993_929_586_072_108e-14,
    4.518_980_029_619_918e-16,
    -1.035_651_761_218_125e-17,
];

/// Complex dilogarithm (Spence function) `Li₂(z) = -∫₀^z ln(1-t)/t dt`.
///
/// Arguments outside the unit disk are mapped inside by the inversion
/// identity, arguments with `Re z > 1/2` are reflected through `1-z`, and the
/// remainder is summed as the Bernoulli series in `u = -ln(1-z)`. On the real
/// cut `z > 1` the branch side follows `cln`, i.e. the value continuous with
/// `m² − i0` inputs.
pub fn dilog(z: Complex64) -> Complex64 {
    let one = Complex64::new(1.0, 0.0);
    let pi2_6 = Complex64::new(PI * PI / 6.0, 0.0);

    if z == Complex64::default() {
        return Complex64::default();
    }
    if z == one {
        return pi2_6;
    }

    // Inversion: |z| > 1 → 1/z inside the unit disk.
    if z.norm_sqr() > 1.0 {
        let l = cln(-z);
        return -dilog(one / z) - pi2_6 - 0.5 * l * l;
    }

    // Reflection: Re z > 1/2 → 1-z, which stays inside the disk.
    if z.re > 0.5 {
        return pi2_6 - cln(z) * cln(one - z) - dilog(one - z);
    }

    let u = -(one - z).ln();
    let u2 = u * u;
    let mut sum = u - 0.25 * u2;
    let mut upow = u * u2;
    for coeff in DILOG_SERIES {
        let term = coeff * upow;
        sum += term;
        if term.norm_sqr() < 1e-64 * sum.norm_sqr() {
            break;
        }
        upow *= u2;
    }
    sum
}
