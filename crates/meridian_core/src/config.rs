//! Engine construction options.

use std::path::PathBuf;

use meridian_frames::Ellipsoid;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Most refraction fixed-point iterations the engine will run.
pub const MAX_REFRACTION_ITERATIONS: u8 = 3;

/// Default zenith distance (degrees) beyond which the refraction formula is
/// evaluated at the clamp instead.
pub const DEFAULT_ZENITH_CLAMP_DEG: f64 = 89.9;

/// Configuration for constructing an [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Leap-second kernel; `None` uses the compiled-in IERS table.
    pub lsk_path: Option<PathBuf>,
    /// Refraction iterations, 1..=3.
    pub refraction_iterations: u8,
    /// Refraction zenith clamp in degrees, 0 < clamp < 90.
    pub zenith_clamp_deg: f64,
    /// Ellipsoid for sites that do not name one.
    pub ellipsoid: Ellipsoid,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lsk_path: None,
            refraction_iterations: MAX_REFRACTION_ITERATIONS,
            zenith_clamp_deg: DEFAULT_ZENITH_CLAMP_DEG,
            ellipsoid: Ellipsoid::default(),
        }
    }
}

impl EngineConfig {
    /// Configuration reading leap seconds from an LSK file.
    pub fn with_lsk(lsk_path: PathBuf) -> Self {
        Self {
            lsk_path: Some(lsk_path),
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), EngineError> {
        if !(1..=MAX_REFRACTION_ITERATIONS).contains(&self.refraction_iterations) {
            return Err(EngineError::InvalidConfig(
                "refraction_iterations must be between 1 and 3",
            ));
        }
        if !(self.zenith_clamp_deg > 0.0 && self.zenith_clamp_deg < 90.0) {
            return Err(EngineError::InvalidConfig(
                "zenith_clamp_deg must be strictly between 0 and 90",
            ));
        }
        Ok(())
    }

    pub(crate) fn zenith_clamp(&self) -> f64 {
        self.zenith_clamp_deg.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.refraction_iterations, 3);
        assert_eq!(config.ellipsoid, Ellipsoid::Wgs84);
    }

    #[test]
    fn iterations_out_of_range() {
        for n in [0, 4] {
            let config = EngineConfig {
                refraction_iterations: n,
                ..EngineConfig::default()
            };
            assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
        }
    }

    #[test]
    fn clamp_out_of_range() {
        for clamp in [0.0, 90.0, f64::NAN] {
            let config = EngineConfig {
                zenith_clamp_deg: clamp,
                ..EngineConfig::default()
            };
            assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
        }
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"ellipsoid": "grs80"}"#).unwrap();
        assert_eq!(config.ellipsoid, Ellipsoid::Grs80);
        assert_eq!(config.zenith_clamp_deg, DEFAULT_ZENITH_CLAMP_DEG);
        assert!(config.lsk_path.is_none());
    }
}
