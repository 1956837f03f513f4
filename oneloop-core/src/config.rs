use std::str::FromStr;
use std::sync::RwLock;

use crate::error::{Error, Result};
use crate::types::{LogLevel, UnitConvention};

/// Immutable evaluation configuration.
///
/// Every engine call takes a `&Config`; results are a pure function of the
/// kinematic point and this value. The process-wide setter surface below is a
/// compatibility layer that snapshots into one of these at call entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Renormalization scale μ². Strictly positive.
    pub mu2: f64,
    /// Relative tolerance for degeneracy detection. Non-negative.
    pub onshell_threshold: f64,
    /// Normalization convention applied to every returned coefficient.
    pub unit_convention: UnitConvention,
    /// Diagnostic verbosity. No effect on numeric output.
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mu2: 1.0,
            onshell_threshold: 1e-10,
            unit_convention: UnitConvention::Default,
            log_level: LogLevel::Warning,
        }
    }
}

impl Config {
    /// Builder-style scale replacement. Fails on `mu2 <= 0` or non-finite.
    pub fn with_renormalization_scale(mut self, mu2: f64) -> Result<Self> {
        if !(mu2.is_finite() && mu2 > 0.0) {
            return Err(Error::Configuration(format!(
                "renormalization scale must be finite and positive, got {mu2}"
            )));
        }
        self.mu2 = mu2;
        Ok(self)
    }

    /// Builder-style threshold replacement. Fails on negative or non-finite.
    pub fn with_onshell_threshold(mut self, eps: f64) -> Result<Self> {
        if !(eps.is_finite() && eps >= 0.0) {
            return Err(Error::Configuration(format!(
                "on-shell threshold must be finite and non-negative, got {eps}"
            )));
        }
        self.onshell_threshold = eps;
        Ok(self)
    }

    pub fn with_unit_convention(mut self, conv: UnitConvention) -> Self {
        self.unit_convention = conv;
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Absolute degeneracy tolerance for a point of the given representative
    /// scale.
    pub fn tolerance_at(&self, scale: f64) -> f64 {
        self.onshell_threshold * scale
    }
}

static CONFIGURED: RwLock<Config> = RwLock::new(Config {
    mu2: 1.0,
    onshell_threshold: 1e-10,
    unit_convention: UnitConvention::Default,
    log_level: LogLevel::Warning,
});

/// Atomic snapshot of the process-wide configured state.
pub fn snapshot() -> Config {
    *CONFIGURED.read().unwrap_or_else(|e| e.into_inner())
}

fn update(f: impl FnOnce(&mut Config)) {
    let mut guard = CONFIGURED.write().unwrap_or_else(|e| e.into_inner());
    f(&mut guard);
}

/// Replace the stored renormalization scale μ² used in every subsequent
/// logarithmic term. Fails with a configuration error on `mu2 <= 0`.
pub fn set_renormalization_scale(mu2: f64) -> Result<()> {
    let validated = snapshot().with_renormalization_scale(mu2)?;
    update(|c| c.mu2 = validated.mu2);
    Ok(())
}

/// Replace the stored degeneracy tolerance. Fails on `eps < 0`.
pub fn set_onshell_threshold(eps: f64) -> Result<()> {
    let validated = snapshot().with_onshell_threshold(eps)?;
    update(|c| c.onshell_threshold = validated.onshell_threshold);
    Ok(())
}

/// Select the normalization convention by name (`default` or `feynman`).
pub fn set_unit_convention(name: &str) -> Result<()> {
    let conv = UnitConvention::from_str(name)?;
    update(|c| c.unit_convention = conv);
    Ok(())
}

/// Select the diagnostic verbosity by name
/// (`quiet`, `error`, `warning`/`default`, `message`, `printall`).
pub fn set_log_level(name: &str) -> Result<()> {
    let level = LogLevel::from_str(name)?;
    update(|c| c.log_level = level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scale_is_one() {
        assert_eq!(Config::default().mu2, 1.0);
    }

    #[test]
    fn rejects_non_positive_scale() {
        assert!(Config::default().with_renormalization_scale(0.0).is_err());
        assert!(Config::default().with_renormalization_scale(-2.0).is_err());
        assert!(Config::default()
            .with_renormalization_scale(f64::NAN)
            .is_err());
        assert!(Config::default().with_renormalization_scale(10.0).is_ok());
    }

    #[test]
    fn rejects_negative_threshold() {
        assert!(Config::default().with_onshell_threshold(-1e-3).is_err());
        assert!(Config::default().with_onshell_threshold(0.0).is_ok());
    }

    #[test]
    fn tolerance_scales_with_point() {
        let cfg = Config::default().with_onshell_threshold(1e-3).unwrap();
        assert_eq!(cfg.tolerance_at(100.0), 0.1);
    }

    #[test]
    fn setter_surface_round_trips() {
        set_renormalization_scale(3.5).unwrap();
        assert_eq!(snapshot().mu2, 3.5);
        set_unit_convention("feynman").unwrap();
        assert_eq!(snapshot().unit_convention, UnitConvention::Feynman);
        assert!(set_unit_convention("unknown").is_err());
        // Restore defaults so other tests sharing the process state see them.
        set_renormalization_scale(1.0).unwrap();
        set_unit_convention("default").unwrap();
    }
}
