use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::vcs::DEFAULT_TIMEOUT;

/// User configuration from `~/.claude/glance.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root of the per-session prompt storage.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Upper bound for each git query.
    #[serde(default = "default_git_timeout_secs")]
    pub git_timeout_secs: u64,
}

fn default_git_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            git_timeout_secs: default_git_timeout_secs(),
        }
    }
}

impl Config {
    pub fn git_timeout(&self) -> Duration {
        Duration::from_secs(self.git_timeout_secs.max(1))
    }
}

/// `$HOME/.claude/glance.toml`.
pub fn default_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME not set; use --config")?;
    Ok(PathBuf::from(home).join(".claude").join("glance.toml"))
}

/// Load configuration from `path`.
///
/// Falls back to defaults if the file is missing.
pub fn load(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(config)
}
