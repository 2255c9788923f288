//! Seeding defaults applied when a request or event leaves them open.

use heat_core::enums::SeedingCriteria;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Standard outdoor track.
const fn default_max_lanes() -> u32 {
    8
}

/// Standard indoor oval.
const fn default_max_lanes_indoor() -> u32 {
    6
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SeedingConfig {
    #[serde(default = "default_max_lanes")]
    pub default_max_lanes: u32,

    #[serde(default = "default_max_lanes_indoor")]
    pub default_max_lanes_indoor: u32,

    /// Source chain used by simple-mode generation.
    #[serde(default)]
    pub default_criteria: SeedingCriteria,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            default_max_lanes: default_max_lanes(),
            default_max_lanes_indoor: default_max_lanes_indoor(),
            default_criteria: SeedingCriteria::default(),
        }
    }
}

impl SeedingConfig {
    /// Reject lane defaults that could never seat an entrant.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the zero field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("seeding.default_max_lanes", self.default_max_lanes),
            ("seeding.default_max_lanes_indoor", self.default_max_lanes_indoor),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = SeedingConfig::default();
        assert_eq!(config.default_max_lanes, 8);
        assert_eq!(config.default_max_lanes_indoor, 6);
        assert_eq!(config.default_criteria, SeedingCriteria::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_indoor_lanes_rejected() {
        let config = SeedingConfig {
            default_max_lanes_indoor: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_max_lanes_indoor"));
    }
}
