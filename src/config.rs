use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::batch::DEFAULT_CONCURRENCY;

/// Root configuration structure, deserialized from `.pnpm-licenses/config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub resolve: ResolveConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

/// Settings for license-text resolution.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveConfig {
    /// Maximum number of dependencies resolved at the same time.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Directory of extra `<SPDX-ID>.txt` license templates. Relative paths
    /// are resolved against the directory holding the config file.
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            templates_dir: None,
        }
    }
}

/// Dependency-name filters applied on every run, in addition to `--filter`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<project_path>/.pnpm-licenses/config.toml`
/// 3. `~/.config/pnpm-licenses/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".pnpm-licenses").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("pnpm-licenses")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let mut config: Config =
        toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))?;

    if let (Some(dir), Some(base)) = (&config.resolve.templates_dir, path.parent()) {
        if dir.is_relative() {
            config.resolve.templates_dir = Some(base.join(dir));
        }
    }

    Ok(config)
}
