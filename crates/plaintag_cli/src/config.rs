//! PlainTag configuration file handling

use anyhow::{Context, Result};
use plaintag_core::LifecycleConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level configuration (plaintag.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PlaintagConfig {
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl PlaintagConfig {
    /// Load configuration from a file, or from `plaintag.toml` inside a directory
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join("plaintag.toml")
        } else {
            path.to_path_buf()
        };

        if !config_path.exists() {
            anyhow::bail!("No config found at {}", config_path.display());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
