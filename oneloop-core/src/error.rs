use thiserror::Error;

/// Failure modes of the evaluation engines and the configuration surface.
///
/// Near-degenerate kinematics are never errors: they are resolved internally
/// by branch selection. Only configurations with no valid regularized value
/// (or invalid configuration input) surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Non-positive renormalization scale, negative threshold, or an
    /// unrecognized enum name passed to a setter.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A kinematic input lies outside the supported analytic-continuation
    /// region (e.g. a mass with the acausal imaginary-part sign, or an
    /// infrared-divergent mixed-mass point the engine does not continue).
    #[error("domain error: {0}")]
    Domain(String),

    /// The requested point is a genuinely non-regularizable divergence;
    /// no branch formula can resolve it.
    #[error("singular configuration: {0}")]
    SingularConfiguration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
