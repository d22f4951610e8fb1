use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tambola_core::GameConfig;

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tambola")
        .join("config.json")
}

/// An explicit path must exist; the default location is optional.
pub fn load_game_config(explicit: Option<&Path>) -> Result<GameConfig> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (default_config_path(), false),
    };

    if !required && !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(GameConfig::default());
    }

    let config = GameConfig::load(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}
