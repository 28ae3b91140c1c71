use std::fs;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::scanner::types::ExtensionMatch;

/// Settings for one uploader run, passed explicitly into the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Year prepended to log timestamps, which carry none
    pub assumed_year: i32,
    pub extension_match: ExtensionMatch,
    /// Overrides the detected system drive, which is never offered
    pub system_volume: Option<PathBuf>,
    pub ingest: IngestConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assumed_year: chrono::Local::now().year(),
            extension_match: ExtensionMatch::default(),
            system_volume: None,
            ingest: IngestConfig::default(),
        }
    }
}

/// Pool queried before every ingestion unless configured otherwise.
pub const DEFAULT_DATA_POOL: &str = "wus2-se-cariad-speedboats";

/// How the companion CLI is launched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Executable name or path
    pub program: String,
    /// CLI install directory, used as working directory
    pub working_dir: Option<PathBuf>,
    /// `store-explore get-stats` runs against this pool first; empty skips it
    pub data_pool_id: Option<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            program: "gmdm_companion_cli".to_string(),
            working_dir: None,
            data_pool_id: Some(DEFAULT_DATA_POOL.to_string()),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text, path)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
