//! Library configuration.
//!
//! [`CookmateConfig`] carries the tunables of the recipe book: listing page
//! size, the input length cap applied when sanitizing drafts, and ranking
//! options. Every field has a default, so a YAML file only needs to name the
//! values it changes:
//!
//! ```yaml
//! page_size: 20
//! ranking:
//!   drop_unmatched: true
//! ```

use crate::model::DEFAULT_MAX_INPUT_LEN;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of recipes per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Options for ingredient ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Remove recipes with no matching ingredient from ranked results.
    ///
    /// Off by default: ranking keeps zero-match recipes at the end.
    pub drop_unmatched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookmateConfig {
    pub page_size: usize,
    pub max_input_len: usize,
    pub ranking: RankingConfig,
}

impl Default for CookmateConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_input_len: DEFAULT_MAX_INPUT_LEN,
            ranking: RankingConfig::default(),
        }
    }
}

impl CookmateConfig {
    /// Parses a configuration from YAML text.
    ///
    /// Empty input yields the default configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML configuration file.
    pub fn from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        tracing::debug!(%path, ?config, "loaded configuration");
        Ok(config)
    }
}
