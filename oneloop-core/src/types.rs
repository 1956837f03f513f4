use num_complex::Complex64;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Conversion factor from the internal (Ellis–Zanderighi style) normalization
/// of one-loop scalar integrals to the textbook Feynman-diagram normalization.
///
/// Numerically this is `-1/(16 π²)`.
pub const TO_FEYNMAN: f64 = -1.0 / (16.0 * PI * PI);

/// Laurent expansion coefficients of a one-loop scalar function in the
/// dimensional-regularization parameter `ε = (4-d)/2`, truncated at ε⁰.
///
/// - `values[0]`  ε⁰ coefficient (finite term)
/// - `values[1]`  ε⁻¹ coefficient (vanishes for finite cases)
/// - `values[2]`  ε⁻² coefficient (vanishes for finite cases)
#[derive(Clone, Copy, Default, PartialEq)]
pub struct LaurentSeries {
    values: [Complex64; 3],
}

impl LaurentSeries {
    pub fn new(epsilon_0: Complex64, epsilon_minus_1: Complex64, epsilon_minus_2: Complex64) -> Self {
        Self {
            values: [epsilon_0, epsilon_minus_1, epsilon_minus_2],
        }
    }

    /// The all-zero expansion (scaleless integrals).
    pub fn zero() -> Self {
        Self::default()
    }

    /// A purely finite expansion.
    pub fn finite(epsilon_0: Complex64) -> Self {
        Self::new(epsilon_0, Complex64::default(), Complex64::default())
    }

    /// Getter for the ε⁰ coefficient.
    pub fn epsilon_0(&self) -> Complex64 {
        self.values[0]
    }

    /// Getter for the ε⁻¹ coefficient.
    pub fn epsilon_minus_1(&self) -> Complex64 {
        self.values[1]
    }

    /// Getter for the ε⁻² coefficient.
    pub fn epsilon_minus_2(&self) -> Complex64 {
        self.values[2]
    }

    /// Coefficient-wise rescaling, used for unit-convention conversion and
    /// for the reduction weights in the triangle and box engines.
    pub fn scaled(&self, factor: Complex64) -> Self {
        Self {
            values: [
                self.values[0] * factor,
                self.values[1] * factor,
                self.values[2] * factor,
            ],
        }
    }

    /// Coefficient-wise sum.
    pub fn add(&self, other: &Self) -> Self {
        Self {
            values: [
                self.values[0] + other.values[0],
                self.values[1] + other.values[1],
                self.values[2] + other.values[2],
            ],
        }
    }
}

impl fmt::Display for LaurentSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ε⁰: {}, ε⁻¹: {}, ε⁻²: {}",
            self.values[0], self.values[1], self.values[2]
        )
    }
}

impl fmt::Debug for LaurentSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaurentSeries")
            .field("epsilon_0", &self.values[0])
            .field("epsilon_minus_1", &self.values[1])
            .field("epsilon_minus_2", &self.values[2])
            .finish()
    }
}

/// A kinematic point for one of the four supported topologies.
///
/// All fields are squared quantities: `m*` are internal mass-squared values,
/// `p*` are external invariants. Physical inputs are real, but every field is
/// complex so the engines can continue above or below branch cuts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KinematicPoint {
    OnePoint {
        m: Complex64,
    },
    TwoPoint {
        p: Complex64,
        m1: Complex64,
        m2: Complex64,
    },
    ThreePoint {
        p1: Complex64,
        p2: Complex64,
        p3: Complex64,
        m1: Complex64,
        m2: Complex64,
        m3: Complex64,
    },
    FourPoint {
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
    },
}

impl KinematicPoint {
    /// All invariants and masses of the point, in a fixed order.
    pub fn entries(&self) -> Vec<Complex64> {
        match *self {
            KinematicPoint::OnePoint { m } => vec![m],
            KinematicPoint::TwoPoint { p, m1, m2 } => vec![p, m1, m2],
            KinematicPoint::ThreePoint {
                p1,
                p2,
                p3,
                m1,
                m2,
                m3,
            } => vec![p1, p2, p3, m1, m2, m3],
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
            } => vec![p1, p2, p3, p4, p12, p23, m1, m2, m3, m4],
        }
    }

    /// Representative kinematic scale: the largest magnitude among all
    /// invariants and mass-squared values. Used to make degeneracy
    /// comparisons relative rather than absolute.
    pub fn scale(&self) -> f64 {
        let max = self
            .entries()
            .iter()
            .map(|z| z.norm())
            .fold(0.0_f64, f64::max);
        if max == 0.0 {
            1.0
        } else {
            max
        }
    }
}

/// Multiplicative normalization applied to every returned coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitConvention {
    /// Raw internal normalization (no prefactor).
    #[default]
    Default,
    /// Textbook Feynman-diagram normalization (`TO_FEYNMAN` prefactor).
    Feynman,
}

impl UnitConvention {
    pub fn factor(self) -> f64 {
        match self {
            UnitConvention::Default => 1.0,
            UnitConvention::Feynman => TO_FEYNMAN,
        }
    }
}

impl FromStr for UnitConvention {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(UnitConvention::Default),
            "feynman" => Ok(UnitConvention::Feynman),
            other => Err(Error::Configuration(format!(
                "unknown unit convention: {other}"
            ))),
        }
    }
}

/// Diagnostic verbosity. Purely informational; never changes numeric output.
///
/// Parsed names: `quiet`, `error`, `warning` (alias `default`), `message`,
/// `printall`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Quiet,
    Error,
    #[default]
    Warning,
    Message,
    PrintAll,
}

impl LogLevel {
    /// Whether reduced-accuracy (precision) diagnostics should be emitted.
    pub fn warns(self) -> bool {
        self >= LogLevel::Warning
    }

    /// Whether branch-dispatch traces should be emitted.
    pub fn traces(self) -> bool {
        self >= LogLevel::Message
    }
}

/// Causality check for internal masses: the Feynman prescription requires a
/// non-positive imaginary part on every mass-squared argument.
pub(crate) fn check_causal_masses(masses: &[Complex64]) -> Result<(), Error> {
    for (i, m) in masses.iter().enumerate() {
        if m.im > 0.0 {
            return Err(Error::Domain(format!(
                "mass-squared argument {} has positive imaginary part {} (acausal sign)",
                i + 1,
                m.im
            )));
        }
    }
    Ok(())
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" => Ok(LogLevel::Quiet),
            "error" => Ok(LogLevel::Error),
            "warning" | "default" => Ok(LogLevel::Warning),
            "message" => Ok(LogLevel::Message),
            "printall" => Ok(LogLevel::PrintAll),
            other => Err(Error::Configuration(format!("unknown log level: {other}"))),
        }
    }
}
