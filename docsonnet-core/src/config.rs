//! Configuration for the docsonnet decoder

use crate::DocError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration as TOML
pub const DEFAULT_CONFIG: &str = r##"# Docsonnet decoder configuration

[decode]
# Prefix that marks a key as documentation metadata.
# The marker alone is the reserved package declaration key.
marker = "#"
# Maximum nesting depth walked before giving up
max_depth = 256
"##;

/// Decoder configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub decode: DecodeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeConfig {
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_marker() -> String {
    "#".to_string()
}
fn default_max_depth() -> usize {
    256
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            max_depth: default_max_depth(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| DocError::ConfigParse(e.to_string()))?;
        if config.decode.marker.is_empty() {
            return Err(DocError::ConfigParse(
                "decode.marker must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}
