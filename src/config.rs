//! Configuration System
//!
//! Host-facing configuration for embedding the dispatch core: layered loading
//! from a user-level config file with environment variable overrides.

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeraldConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Loader for layered configuration: defaults, then the user-level config
/// file (when present), then `HERALD_*` environment variables.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Path to the user-level config file
    /// (`$XDG_CONFIG_HOME/herald/config.toml` or the platform equivalent).
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "herald")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the user-level file (if any) plus environment
    /// overrides.
    pub fn load() -> Result<HeraldConfig, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = Self::user_config_path() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()).required(false));
            }
        }
        let settings = builder
            .add_source(Environment::with_prefix("HERALD").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Load configuration from an explicit file plus environment overrides.
    pub fn load_from_file(path: &Path) -> Result<HeraldConfig, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("HERALD").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
