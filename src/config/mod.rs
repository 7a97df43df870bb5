mod schema;

pub use schema::{ArtifactsConfig, Config};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::policy::DecisionPolicy;

/// Get the config directory path (~/.config/credit-lens/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("credit-lens"))
}

/// Get the default config file path (~/.config/credit-lens/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// A parsed configuration plus the directory its relative paths resolve against.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub base_dir: PathBuf,
    /// Built from `config.policy`, already validated.
    pub policy: DecisionPolicy,
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/credit-lens/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
/// - The policy section is invalid (all problems are listed)
pub fn load_config(path: Option<PathBuf>) -> Result<LoadedConfig> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Create ~/.config/credit-lens/config.yaml",
            config_path.display()
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    let policy = DecisionPolicy::new(config.policy).map_err(|errors| {
        anyhow::anyhow!("Invalid policy configuration:\n  - {}", errors.join("\n  - "))
    })?;

    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    Ok(LoadedConfig {
        config,
        base_dir,
        policy,
    })
}
