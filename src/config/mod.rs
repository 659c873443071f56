mod overrides;
mod schema;

pub use overrides::{apply_settings, is_tuned, OverrideError};
pub use schema::{RankingOverrides, Settings, SourceOverride};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/consensus-rank/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("consensus-rank"))
}

/// Get the default settings file path (~/.config/consensus-rank/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load settings from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to the settings file. If None, uses the default
///   path (~/.config/consensus-rank/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given settings file does not exist
/// - The settings file cannot be read
/// - The YAML cannot be parsed
///
/// A missing file at the default path is not an error; it means no overrides.
pub fn load_config(path: Option<PathBuf>) -> Result<Settings> {
    let (config_path, explicit) = match path {
        Some(p) => (p, true),
        None => (get_config_path()?, false),
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Settings file not found at {}", config_path.display());
        }
        tracing::debug!("No settings file at {}, using dataset defaults", config_path.display());
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read settings file at {}", config_path.display()))?;

    let settings: Settings = serde_saphyr::from_str(&content).with_context(|| {
        format!("Failed to parse settings: invalid YAML in {}", config_path.display())
    })?;

    Ok(settings)
}
