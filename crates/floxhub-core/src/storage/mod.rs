mod config;

pub use config::{Config, ScoreConfig, SyncConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/floxhub[-dev]/` based on FLOXHUB_ENV.
///
/// Set FLOXHUB_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FLOXHUB_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("floxhub-dev")
    } else {
        base_dir.join("floxhub")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
