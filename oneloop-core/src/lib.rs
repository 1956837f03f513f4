//! # oneloop-core
//!
//! Regularized scalar one-loop integrals — tadpole, bubble, triangle and box
//! — evaluated as Laurent expansion coefficients (`ε⁻²`, `ε⁻¹`, `ε⁰`) in
//! dimensional regularization, for real or complex external invariants and
//! internal masses with the Feynman `−i0` prescription.
//!
//! ## Example
//!
//! ```rust
//! use num_complex::Complex64;
//! use oneloop_core::{Config, Evaluator, TO_FEYNMAN};
//!
//! let ev = Evaluator::new(Config::default());
//! let result = ev
//!     .two_point(
//!         Complex64::new(1.0, 0.0),
//!         Complex64::new(0.5, 0.0),
//!         Complex64::new(0.2, 0.0),
//!     )
//!     .unwrap();
//! println!("finite part (Feynman convention): {}", result.epsilon_0() * TO_FEYNMAN);
//! ```

// Foundations: value types, configuration, errors
pub mod config;
pub mod error;
pub mod types;

// Numerics subsystem: special functions, classification, reduction machinery
pub mod classify;
pub mod reduction;
pub mod special;

// Evaluation engines, by topology
pub mod four_point;
pub mod one_point;
pub mod three_point;
pub mod two_point;

// Session object and configured-state call surface
pub mod evaluator;

// Public value-type API
pub use crate::classify::ClassificationTag;
pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::types::{KinematicPoint, LaurentSeries, LogLevel, UnitConvention, TO_FEYNMAN};

// Public configured-state API
pub use crate::config::{
    set_log_level, set_onshell_threshold, set_renormalization_scale, set_unit_convention,
};

// Public evaluation API. The free functions share their names with the
// engine modules; functions live in the value namespace, modules in the
// type namespace.
pub use crate::evaluator::{
    four_point, four_point_complex, one_point, one_point_complex, three_point,
    three_point_complex, two_point, two_point_complex, Evaluator,
};
