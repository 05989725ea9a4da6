//! Runtime configuration: `tiller.yaml` (or `$TILLER_CONFIG`) plus environment overrides.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//!
//! ```yaml
//! server:
//!   bind: 0.0.0.0:8080
//! lineup:
//!   default_rows: 10
//!   max_rows: 50
//!   trim_tolerance_kg: 0.5
//!   max_pool_size: 500
//! parallel:
//!   workers: 4
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::boat::{DEFAULT_ROWS, MAX_LAYOUT_ROWS};
use crate::optimizer::{LineupOptions, DEFAULT_MAX_ROWS, DEFAULT_TRIM_TOLERANCE_KG};

pub const DEFAULT_CONFIG_PATH: &str = "tiller.yaml";
pub const CONFIG_ENV_VAR: &str = "TILLER_CONFIG";
pub const BIND_ENV_VAR: &str = "TILLER_BIND";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub lineup: LineupConfig,
    pub parallel: ParallelConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineupConfig {
    /// Rows used when a request omits `rows`.
    pub default_rows: usize,
    /// Largest row count the API accepts.
    pub max_rows: usize,
    pub trim_tolerance_kg: f64,
    /// Largest participant pool the API accepts per request.
    pub max_pool_size: usize,
}

impl Default for LineupConfig {
    fn default() -> Self {
        Self {
            default_rows: DEFAULT_ROWS,
            max_rows: DEFAULT_MAX_ROWS,
            trim_tolerance_kg: DEFAULT_TRIM_TOLERANCE_KG,
            max_pool_size: 500,
        }
    }
}

impl LineupConfig {
    pub fn options(&self) -> LineupOptions {
        LineupOptions {
            default_rows: self.default_rows,
            max_rows: self.max_rows,
            trim_tolerance_kg: self.trim_tolerance_kg,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Worker threads for batch solving. 0 uses the rayon default (all cores).
    pub workers: usize,
}

impl AppConfig {
    /// Load from `$TILLER_CONFIG`, else `tiller.yaml` when present, else defaults;
    /// then apply `$TILLER_BIND`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_path(PathBuf::from(path))?,
            None if Path::new(DEFAULT_CONFIG_PATH).is_file() => Self::from_path(DEFAULT_CONFIG_PATH)?,
            None => {
                debug!("no config file found, using defaults");
                Self::default()
            }
        };
        if let Ok(bind) = env::var(BIND_ENV_VAR) {
            config.server.bind = bind;
        }
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loading config from {}", path.display());
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let lineup = &self.lineup;
        if !(1..=MAX_LAYOUT_ROWS).contains(&lineup.max_rows) {
            return Err(ConfigError::Invalid(format!(
                "lineup.max_rows must be between 1 and {MAX_LAYOUT_ROWS}"
            )));
        }
        if !(1..=lineup.max_rows).contains(&lineup.default_rows) {
            return Err(ConfigError::Invalid(format!(
                "lineup.default_rows must be between 1 and {}",
                lineup.max_rows
            )));
        }
        if !lineup.trim_tolerance_kg.is_finite() || lineup.trim_tolerance_kg < 0.0 {
            return Err(ConfigError::Invalid(
                "lineup.trim_tolerance_kg must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}
