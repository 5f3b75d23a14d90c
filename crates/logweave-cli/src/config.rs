use crate::types::ColorChoice;
use anyhow::{Context, Result, anyhow};
use logweave_formats::ClassifierConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Resolve the config file path based on priority:
/// 1. Explicit path
/// 2. LOGWEAVE_CONFIG environment variable
/// 3. `<user config dir>/logweave/config.toml`
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(path.to_path_buf());
    }

    if let Some(env_path) = std::env::var_os("LOGWEAVE_CONFIG") {
        return Ok(PathBuf::from(env_path));
    }

    dirs::config_dir()
        .map(|dir| dir.join("logweave").join("config.toml"))
        .ok_or_else(|| anyhow!("Could not determine config path: no user config directory"))
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub expand_all: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub timestamps: bool,
    pub line_numbers: bool,
    pub color: ColorChoice,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let config_path = resolve_config_path(explicit_path)?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }
}
