//! Configuration loading and typed config structures for the Warband engine.
//!
//! The configuration lives in `warband-config.yaml` at the project root.
//! Every section and field has a default, so an empty file (or a missing
//! section) is valid. Library code only ever sees the typed section structs.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use warband_agents::CombatConfig;

use crate::overlord::FortifyConfig;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration, mirroring `warband-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Run length and scenario seed.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Combat overlord tunables.
    #[serde(default)]
    pub combat: CombatConfig,

    /// Fortify overlord tunables.
    #[serde(default)]
    pub fortify: FortifyConfig,

    /// Durable memory settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Run boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Ticks to run before stopping (default: 50).
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Seed for scenario generation (default: 7).
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            seed: default_seed(),
        }
    }
}

/// Where agent memory is persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MemoryConfig {
    /// JSON file the memory store is loaded from and saved to after every
    /// tick. Memory stays in-process when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is unset (default: `info`).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_max_ticks() -> u64 {
    50
}

const fn default_seed() -> u64 {
    7
}

fn default_log_level() -> String {
    "info".to_owned()
}
