//! Rig configuration
//!
//! One TOML file describes the whole rig. The default `rig.toml` is compiled
//! into the binary; a file given on the command line replaces it. Missing
//! keys fall back to the built-in defaults.

pub mod loader;

use codex_core::config::{
    CameraConfig, DescentConfig, MotionConfig, PinsConfig, RoutingConfig, TimingConfig,
};
use codex_core::motion::MOTION_EPSILON_MM;
use serde::{Deserialize, Serialize};

pub use loader::{apply_env_overrides, load_config, parse_config, EMBEDDED_CONFIG};

use crate::error::ConfigError;

/// Environment variable overriding the stage URL
pub const ENV_STAGE_URL: &str = "CODEX_STAGE_URL";

/// Environment variable overriding the stage API key
pub const ENV_STAGE_API_KEY: &str = "CODEX_STAGE_API_KEY";

/// Motion controller connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Base URL of the stage controller
    pub url: String,
    /// API key sent with every request
    pub api_key: String,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
            api_key: String::new(),
        }
    }
}

/// Complete rig configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub stage: StageConfig,
    pub pins: PinsConfig,
    pub camera: CameraConfig,
    pub motion: MotionConfig,
    pub descent: DescentConfig,
    pub routing: RoutingConfig,
    pub timing: TimingConfig,
}

impl RigConfig {
    /// Check values the type system cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Anything smaller is dropped by the driver as no motion
        if !is_positive(self.descent.step_mm) || self.descent.step_mm <= MOTION_EPSILON_MM {
            return Err(invalid(format!(
                "descent.step_mm must be larger than {} mm, got {}",
                MOTION_EPSILON_MM,
                self.descent.step_mm
            )));
        }

        if let Some(limit) = self.descent.max_travel_mm {
            if !is_positive(limit) {
                return Err(invalid(format!(
                    "descent.max_travel_mm must be positive, got {}",
                    limit
                )));
            }
        }

        if !is_positive(self.routing.tile_step_mm) {
            return Err(invalid(format!(
                "routing.tile_step_mm must be positive, got {}",
                self.routing.tile_step_mm
            )));
        }

        if self.routing.clearance_mm < 0.0 {
            return Err(invalid(format!(
                "routing.clearance_mm must not be negative, got {}",
                self.routing.clearance_mm
            )));
        }

        if self.routing.special_labels.iter().any(|l| l.is_empty()) {
            return Err(invalid("routing.special_labels must not contain empty labels"));
        }

        if self.pins.contact.pin == self.pins.suction.pin {
            return Err(invalid(format!(
                "contact and suction share pin {}",
                self.pins.contact.pin
            )));
        }

        Ok(())
    }

    /// Same rig with every wait removed
    pub fn without_waits(mut self) -> Self {
        self.timing = TimingConfig::instant();
        self
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        RigConfig::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_non_positive_step() {
        let mut config = RigConfig::default();
        config.descent.step_mm = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.descent.step_mm = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_step_below_motion_epsilon() {
        let mut config = RigConfig::default();
        config.descent.step_mm = 1e-7;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.descent.step_mm = 0.01;
        config.validate().unwrap();
    }

    #[test]
    fn test_rejects_bad_travel_limit() {
        let mut config = RigConfig::default();
        config.descent.max_travel_mm = Some(-1.0);
        assert!(config.validate().is_err());

        config.descent.max_travel_mm = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_tile_step() {
        let mut config = RigConfig::default();
        config.routing.tile_step_mm = -70.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_shared_pin() {
        let mut config = RigConfig::default();
        config.pins.suction.pin = config.pins.contact.pin;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_without_waits() {
        let config = RigConfig::default().without_waits();
        assert_eq!(config.timing, TimingConfig::instant());
        assert_eq!(config.motion, MotionConfig::default());
    }
}
