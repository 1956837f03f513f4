use num_complex::Complex64;

use crate::classify::{classify, ClassificationTag};
use crate::config::Config;
use crate::error::Result;
use crate::special::cln;
use crate::types::{check_causal_masses, KinematicPoint, LaurentSeries};

/// Raw tadpole in the internal normalization:
/// `ε⁻² = 0`, `ε⁻¹ = m²`, `ε⁰ = m²(1 − ln(m²/μ²))`.
///
/// The massless tadpole is scaleless and vanishes identically; no singular
/// branch is needed.
pub(crate) fn a0(m: Complex64, config: &Config) -> LaurentSeries {
    let point = KinematicPoint::OnePoint { m };
    let tag = classify(&point, config);
    if config.log_level.traces() {
        tracing::debug!(?tag, "tadpole branch");
    }
    match tag {
        ClassificationTag::LightLike => LaurentSeries::zero(),
        _ => {
            let one = Complex64::new(1.0, 0.0);
            let mu2 = Complex64::new(config.mu2, 0.0);
            LaurentSeries::new(m * (one - cln(m / mu2)), m, Complex64::default())
        }
    }
}

/// Evaluate the 1-point (tadpole) function at mass-squared `m`, applying the
/// configured normalization convention.
pub fn evaluate(m: Complex64, config: &Config) -> Result<LaurentSeries> {
    check_causal_masses(&[m])?;
    Ok(a0(m, config).scaled(config.unit_convention.factor().into()))
}
