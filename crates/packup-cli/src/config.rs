use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

const CONFIG_DIR_NAME: &str = "packup";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Optional user configuration, read from `config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PackupConfig {
    pub(crate) repository_base: Option<String>,
    pub(crate) kubectl: Option<String>,
    pub(crate) namespace: Option<String>,
    pub(crate) domain: Option<String>,
}

impl PackupConfig {
    pub(crate) fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).context("failed to parse packup config")
    }

    /// Reads `explicit` when given (it must exist), otherwise the default location if present.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }

        let default_path = default_config_path(
            std::env::var("XDG_CONFIG_HOME").ok().as_deref(),
            std::env::var("HOME").ok().as_deref(),
            std::env::var("APPDATA").ok().as_deref(),
            cfg!(windows),
        );
        match default_path {
            Some(path) if path.exists() => Self::read(&path),
            _ => Ok(Self::default()),
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("invalid config: {}", path.display()))
    }
}

pub(crate) fn default_config_path(
    xdg_config_home: Option<&str>,
    home: Option<&str>,
    app_data: Option<&str>,
    is_windows: bool,
) -> Option<PathBuf> {
    let non_empty = |value: Option<&str>| value.filter(|v| !v.trim().is_empty()).map(PathBuf::from);

    let base = if is_windows {
        non_empty(app_data)
    } else {
        non_empty(xdg_config_home).or_else(|| non_empty(home).map(|home| home.join(".config")))
    }?;
    Some(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
