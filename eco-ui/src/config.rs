//! Planner configuration file.
//!
//! ```toml
//! log_level = "debug"
//! log_file = "eco-planner.log"
//!
//! [storage]
//! backend = "sqlite"
//! connection_string = "eco_plans.db"
//!
//! [scoring]
//! savings_threshold = 0.2
//! ```
//!
//! Every key is optional. Command-line flags override whatever the file
//! sets.

use std::path::{Path, PathBuf};

use eco_core::calculations::{EcoScoreConfig, EcoScoreConfigError};
use eco_core::storage::StorageConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "eco-planner.toml";

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid [scoring] section: {0}")]
    Scoring(#[from] EcoScoreConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub storage: StorageConfig,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub scoring: EcoScoreConfig,
}

/// Values given on the command line, each overriding the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub backend: Option<String>,
    pub database: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl PlannerConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.scoring.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Loads `path` when given; otherwise the default file if present,
    /// falling back to built-in defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn apply(
        mut self,
        overrides: ConfigOverrides,
    ) -> Self {
        if let Some(backend) = overrides.backend {
            self.storage.backend = backend;
        }
        if let Some(database) = overrides.database {
            self.storage.connection_string = database;
        }
        if overrides.log_level.is_some() {
            self.log_level = overrides.log_level;
        }
        if overrides.log_file.is_some() {
            self.log_file = overrides.log_file;
        }
        self
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}
