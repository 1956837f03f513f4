use num_complex::Complex64;

use crate::classify::{classify, ClassificationTag};
use crate::config::{self, Config};
use crate::error::Result;
use crate::types::{KinematicPoint, LaurentSeries};

/// Caller-owned evaluation session holding an immutable configuration.
///
/// Every method is a pure function of its arguments and the held `Config`;
/// an `Evaluator` can be shared freely across threads. The free functions at
/// the crate root are a thin compatibility layer that snapshots the
/// process-wide configured state into one of these per call.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    config: Config,
}

impl Evaluator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Snapshot the process-wide configured state.
    pub fn from_configured() -> Self {
        Self::new(config::snapshot())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 1-point (tadpole) function of a squared mass.
    pub fn one_point(&self, m: Complex64) -> Result<LaurentSeries> {
        crate::one_point::evaluate(m, &self.config)
    }

    /// 2-point (bubble) function of one invariant and two squared masses.
    pub fn two_point(&self, p: Complex64, m1: Complex64, m2: Complex64) -> Result<LaurentSeries> {
        crate::two_point::evaluate(p, m1, m2, &self.config)
    }

    /// 3-point (triangle) function of three invariants and three squared
    /// masses.
    #[allow(clippy::too_many_arguments)]
    pub fn three_point(
        &self,
        p1: Complex64,
        p2: Complex64,
        p3: Complex64,
        m1: Complex64,
        m2: Complex64,
        m3: Complex64,
    ) -> Result<LaurentSeries> {
        crate::three_point::evaluate(p1, p2, p3, m1, m2, m3, &self.config)
    }

    /// 4-point (box) function of six invariants and four squared masses.
    #[allow(clippy::too_many_arguments)]
    pub fn four_point(
        &self,
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
    ) -> Result<LaurentSeries> {
        crate::four_point::evaluate(p1, p2, p3, p4, p12, p23, m1, m2, m3, m4, &self.config)
    }

    /// Kinematic regime of a point under this configuration's threshold.
    pub fn classify(&self, point: &KinematicPoint) -> ClassificationTag {
        classify(point, &self.config)
    }

    /// Topology-dispatched evaluation of a tagged kinematic point.
    pub fn evaluate(&self, point: &KinematicPoint) -> Result<LaurentSeries> {
        match *point {
            KinematicPoint::OnePoint { m } => self.one_point(m),
            KinematicPoint::TwoPoint { p, m1, m2 } => self.two_point(p, m1, m2),
            KinematicPoint::ThreePoint {
                p1,
                p2,
                p3,
                m1,
                m2,
                m3,
            } => self.three_point(p1, p2, p3, m1, m2, m3),
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
            } => self.four_point(p1, p2, p3, p4, p12, p23, m1, m2, m3, m4),
        }
    }
}

/// Tadpole with a real squared mass, under the configured state.
pub fn one_point(m: f64) -> Result<LaurentSeries> {
    Evaluator::from_configured().one_point(m.into())
}

/// Tadpole with a complex squared mass (imaginary part non-positive).
pub fn one_point_complex(m: Complex64) -> Result<LaurentSeries> {
    Evaluator::from_configured().one_point(m)
}

/// Bubble with a real invariant, under the configured state.
pub fn two_point(p: f64, m1: Complex64, m2: Complex64) -> Result<LaurentSeries> {
    Evaluator::from_configured().two_point(p.into(), m1, m2)
}

/// Bubble with a complex invariant.
pub fn two_point_complex(p: Complex64, m1: Complex64, m2: Complex64) -> Result<LaurentSeries> {
    Evaluator::from_configured().two_point(p, m1, m2)
}

/// Triangle with real invariants, under the configured state.
pub fn three_point(
    p1: f64,
    p2: f64,
    p3: f64,
    m1: Complex64,
    m2: Complex64,
    m3: Complex64,
) -> Result<LaurentSeries> {
    Evaluator::from_configured().three_point(p1.into(), p2.into(), p3.into(), m1, m2, m3)
}

/// Triangle with complex invariants.
pub fn three_point_complex(
    p1: Complex64,
    p2: Complex64,
    p3: Complex64,
    m1: Complex64,
    m2: Complex64,
    m3: Complex64,
) -> Result<LaurentSeries> {
    Evaluator::from_configured().three_point(p1, p2, p3, m1, m2, m3)
}

/// Box with real invariants, under the configured state.
#[allow(clippy::too_many_arguments)]
pub fn four_point(
    p1: f64,
    p2: f64,
    p3: f64,
    p4: f64,
    p12: f64,
    p23: f64,
    m1: Complex64,
    m2: Complex64,
    m3: Complex64,
    m4: Complex64,
) -> Result<LaurentSeries> {
    Evaluator::from_configured().four_point(
        p1.into(),
        p2.into(),
        p3.into(),
        p4.into(),
        p12.into(),
        p23.into(),
        m1,
        m2,
        m3,
        m4,
    )
}

/// Box with complex invariants.
#[allow(clippy::too_many_arguments)]
pub fn four_point_complex(
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
) -> Result<LaurentSeries> {
    Evaluator::from_configured().four_point(p1, p2, p3, p4, p12, p23, m1, m2, m3, m4)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64) -> Complex64 {
        Complex64::new(x, 0.0)
    }

    #[test]
    fn dispatch_matches_direct_calls() {
        let ev = Evaluator::new(Config::default());
        let pt = KinematicPoint::TwoPoint {
            p: c(1.0),
            m1: c(0.5),
            m2: c(0.2),
        };
        let via_dispatch = ev.evaluate(&pt).unwrap();
        let direct = ev.two_point(c(1.0), c(0.5), c(0.2)).unwrap();
        assert_eq!(via_dispatch, direct);
    }

    #[test]
    fn evaluators_with_different_configs_are_independent() {
        let a = Evaluator::new(Config::default());
        let b = Evaluator::new(
            Config::default()
                .with_renormalization_scale(100.0)
                .unwrap(),
        );
        let ra = a.one_point(c(0.5)).unwrap();
        let rb = b.one_point(c(0.5)).unwrap();
        assert_eq!(ra.epsilon_minus_1(), rb.epsilon_minus_1());
        assert!((ra.epsilon_0() - rb.epsilon_0()).norm() > 0.1);
    }

    #[test]
    fn real_and_complex_entry_points_agree_on_poles() {
        // Only pole coefficients are compared: the finite parts read the
        // process-wide scale, which other tests may be exercising.
        let r = two_point(1.0, c(0.5), c(0.2)).unwrap();
        let rc = two_point_complex(c(1.0), c(0.5), c(0.2)).unwrap();
        assert_eq!(r.epsilon_minus_1(), rc.epsilon_minus_1());
        assert_eq!(r.epsilon_minus_2(), rc.epsilon_minus_2());
    }
}
