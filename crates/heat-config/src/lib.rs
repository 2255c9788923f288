//! # heat-config
//!
//! Layered configuration loading for the heats engine using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`HEATS_*` prefix, `__` as separator)
//! 2. Project-level `.heats/config.toml`
//! 3. User-level `~/.config/heats/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `HEATS_SEEDING__DEFAULT_MAX_LANES` -> `seeding.default_max_lanes`,
//! `HEATS_DATABASE__PATH` -> `database.path`, and so on.
//!
//! ```no_run
//! use heat_config::HeatConfig;
//!
//! let config = HeatConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod database;
mod error;
mod general;
mod seeding;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use seeding::SeedingConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct HeatConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub seeding: SeedingConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl HeatConfig {
    /// Load configuration from TOML files and environment variables, then
    /// validate it.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] for malformed sources and
    /// [`ConfigError::InvalidValue`] when validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        self.seeding.validate()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".heats/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("HEATS_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("heats").join("config.toml"))
    }

    /// Load the nearest `.env`, walking up at most three directories from the
    /// current one. Silently does nothing if none is found.
    fn load_dotenv() {
        if let Ok(mut dir) = std::env::current_dir() {
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = HeatConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.seeding.default_max_lanes, 8);
        assert_eq!(config.general.default_format, "table");
    }

    #[test]
    fn empty_database_path_rejected() {
        let mut config = HeatConfig::default();
        config.database.path = "  ".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "database.path"
        ));
    }
}
