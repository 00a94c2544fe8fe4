use std::fs;
use std::path::{Path, PathBuf};

use super::validator::ConfigValidator;
use super::AppConfig;
use crate::error::{BtebError, Result};
use crate::utils::{json_validator, secure_file};

pub const ENV_API_URL: &str = "BTEB_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "BTEB_TIMEOUT_SECS";
pub const ENV_CACHE_TTL_SECS: &str = "BTEB_CACHE_TTL_SECS";
pub const ENV_NO_CACHE: &str = "BTEB_NO_CACHE";

const CONFIG_FILE: &str = "config.json";

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
}

/// Loads, validates and persists [`AppConfig`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Manager for the platform config file, e.g.
    /// `~/.config/bteb-results/config.json` on Linux.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: Self::default_config_path()?,
        })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn default_config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "bteb-results", "bteb-results")
            .ok_or_else(|| {
                BtebError::config_error("<config dir>", "Failed to determine config directory")
            })?;
        Ok(dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load the file (if present), apply environment overrides and validate.
    pub fn load(&self) -> Result<(AppConfig, ConfigSource)> {
        let (mut config, source) = self.load_file()?;
        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        self.validate(&config)?;

        tracing::debug!(path = %self.path.display(), source = ?source, "Loaded configuration");
        Ok((config, source))
    }

    fn load_file(&self) -> Result<(AppConfig, ConfigSource)> {
        if !self.path.exists() {
            return Ok((AppConfig::default(), ConfigSource::Defaults));
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            BtebError::io_error(
                "reading config",
                Some(self.path.display().to_string()),
                e,
            )
        })?;
        let config: AppConfig = json_validator::deserialize_bounded(&content).map_err(|e| {
            BtebError::config_error(self.path.display().to_string(), format!("{e:#}"))
        })?;

        Ok((config, ConfigSource::File(self.path.clone())))
    }

    /// Apply `BTEB_*` overrides. `lookup` abstracts the environment so the
    /// rules can be exercised without mutating process state.
    pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            config.api_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = parse_env_u64(ENV_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_CACHE_TTL_SECS) {
            config.cache_ttl_secs = parse_env_u64(ENV_CACHE_TTL_SECS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_NO_CACHE) {
            if matches!(raw.trim(), "1" | "true" | "yes") {
                config.cache_enabled = false;
            }
        }
        Ok(())
    }

    pub fn validate(&self, config: &AppConfig) -> Result<()> {
        ConfigValidator::validate(config).map_err(|errors| {
            let message = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            BtebError::config_error(self.path.display().to_string(), message)
        })
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        self.validate(config)?;
        secure_file::write_json_atomic(&self.path, config)?;
        tracing::info!(path = %self.path.display(), "Saved configuration");
        Ok(())
    }

    /// Write a default config file. An existing file is kept unless `force`.
    pub fn init(&self, force: bool) -> Result<bool> {
        if self.path.exists() && !force {
            return Ok(false);
        }
        self.save(&AppConfig::default())?;
        Ok(true)
    }
}

fn parse_env_u64(key: &str, raw: &str) -> Result<u64> {
    raw.trim().parse().map_err(|_| {
        BtebError::config_error(
            format!("${key}"),
            format!("Expected a whole number of seconds, got '{raw}'"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config.json"));
        let (config, source) = manager.load_file().unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(source, ConfigSource::Defaults);
    }

    #[test]
    fn test_init_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");
        let manager = ConfigManager::with_path(&path);

        assert!(manager.init(false).unwrap());
        assert!(!manager.init(false).unwrap());
        assert!(manager.init(true).unwrap());

        let (config, source) = manager.load_file().unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(source, ConfigSource::File(path));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = ConfigManager::with_path(&path).load_file().unwrap_err();
        assert!(matches!(err, BtebError::ConfigError { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        ConfigManager::apply_env_overrides(
            &mut config,
            env(&[
                (ENV_API_URL, "http://localhost:9000/api"),
                (ENV_TIMEOUT_SECS, " 7 "),
                (ENV_CACHE_TTL_SECS, "0"),
                (ENV_NO_CACHE, "1"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api_url, "http://localhost:9000/api");
        assert_eq!(config.timeout_secs, 7);
        assert_eq!(config.cache_ttl_secs, 0);
        assert!(!config.cache_enabled);
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut config = AppConfig::default();
        let err =
            ConfigManager::apply_env_overrides(&mut config, env(&[(ENV_TIMEOUT_SECS, "soon")]))
                .unwrap_err();
        assert!(err.to_string().contains("BTEB_TIMEOUT_SECS"));
    }

    #[test]
    fn test_save_rejects_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config.json"));
        let config = AppConfig {
            timeout_secs: 0,
            ..AppConfig::default()
        };
        assert!(manager.save(&config).is_err());
        assert!(!manager.path().exists());
    }
}
