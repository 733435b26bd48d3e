//! TOML-based application configuration.
//!
//! Stores:
//! - Score display ceiling and session baseline
//! - Score sync target (actor, endpoint, timeout)
//! - Log level
//!
//! Configuration is stored at `~/.config/floxhub/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::error::ConfigError;
use crate::sync::{ConfiguredSyncer, HttpSyncer, LogSyncer, SyncError};

/// Score display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    #[serde(default = "default_max_score")]
    pub max_score: u64,
    #[serde(default)]
    pub initial_score: u64,
}

/// Score synchronization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_actor_id")]
    pub actor_id: String,
    /// Increment endpoint. Empty means log-only.
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Round trip simulated by the log-only syncer.
    #[serde(default = "default_simulated_latency_ms")]
    pub simulated_latency_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/floxhub/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub score: ScoreConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

// Default functions
fn default_max_score() -> u64 {
    500
}
fn default_actor_id() -> String {
    "intern-001".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_simulated_latency_ms() -> u64 {
    800
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            max_score: default_max_score(),
            initial_score: 0,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            actor_id: default_actor_id(),
            endpoint: String::new(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            simulated_latency_ms: default_simulated_latency_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            score: ScoreConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

impl SyncConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn endpoint(&self) -> Option<&str> {
        let endpoint = self.endpoint.trim();
        (!endpoint.is_empty()).then_some(endpoint)
    }

    /// Build the syncer this configuration points at.
    ///
    /// # Errors
    /// Returns [`SyncError::InvalidEndpoint`] for a malformed endpoint.
    pub fn build_syncer(&self) -> Result<ConfiguredSyncer, SyncError> {
        match self.endpoint() {
            Some(endpoint) => {
                let mut syncer = HttpSyncer::new(endpoint)?;
                if !self.api_key.is_empty() {
                    syncer = syncer.with_api_key(self.api_key.clone());
                }
                Ok(ConfiguredSyncer::Http(syncer))
            }
            None => Ok(ConfiguredSyncer::Log(LogSyncer::new(Duration::from_millis(
                self.simulated_latency_ms,
            )))),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if part.is_empty() {
                return Err(unknown());
            }
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let number = value.parse::<u64>().map_err(|e| {
                            invalid(format!("'{value}' is not a non-negative integer ({e})"))
                        })?;
                        serde_json::Value::Number(number.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("is a section, set one of its keys".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, or defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, or defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value has the wrong type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.score.max_score, 500);
        assert_eq!(cfg.score.initial_score, 0);
        assert_eq!(cfg.sync.actor_id, "intern-001");
        assert_eq!(cfg.sync.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.sync.endpoint(), None);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[score]\nmax_score = 1000\n").unwrap();
        assert_eq!(parsed.score.max_score, 1000);
        assert_eq!(parsed.sync.timeout_secs, 10);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("score.max_score").as_deref(), Some("500"));
        assert_eq!(cfg.get("sync.actor_id").as_deref(), Some("intern-001"));
        assert!(cfg.get("sync.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_number_and_string() {
        let mut cfg = Config::default();
        cfg.set("score.max_score", "750").unwrap();
        cfg.set("sync.endpoint", "https://store.example/rpc/increment").unwrap();
        assert_eq!(cfg.score.max_score, 750);
        assert_eq!(cfg.sync.endpoint(), Some("https://store.example/rpc/increment"));
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("score.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("sync", "x"), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("score.max_score", "-5"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.sync.actor_id = "dev-007".into();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.sync.actor_id, "dev-007");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "score = [").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn syncer_follows_endpoint() {
        let mut cfg = Config::default();
        assert!(matches!(cfg.sync.build_syncer(), Ok(ConfiguredSyncer::Log(_))));

        cfg.sync.endpoint = "http://localhost:9/inc".into();
        assert!(matches!(cfg.sync.build_syncer(), Ok(ConfiguredSyncer::Http(_))));

        cfg.sync.endpoint = "::bad::".into();
        assert!(matches!(cfg.sync.build_syncer(), Err(SyncError::InvalidEndpoint(_))));
    }
}
