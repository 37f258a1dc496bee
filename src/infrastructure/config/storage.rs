//! Configuration file storage.

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use super::app_config::AppConfig;

/// Configuration storage errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No platform config directory and no explicit path.
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Config could not be serialized.
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    /// Config could not be parsed.
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

/// Reads and writes one configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store for `path`, or for the platform default file when `None`.
    ///
    /// # Errors
    /// Returns error if no path is given and the platform has no config directory.
    pub fn locate(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path,
            None => AppConfig::default_config_path().ok_or(ConfigError::ConfigDirNotFound)?,
        };
        Ok(Self { path })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration, writing defaults first if the file is missing.
    ///
    /// A file that fails to parse is left untouched and defaults are used.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or the defaults cannot be written.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "No config file, writing defaults");
            let config = AppConfig::default();
            self.save(&config)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Invalid config file, using defaults");
            AppConfig::default()
        }))
    }

    /// Writes `config` atomically, creating parent directories as needed.
    ///
    /// # Errors
    /// Returns error if serialization or any filesystem step fails.
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config)?;
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let mut file = tempfile::NamedTempFile::new_in(parent)?;
        file.write_all(content.as_bytes())?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &Path, name: &str) -> ConfigStore {
        ConfigStore::locate(Some(dir.join(name))).unwrap()
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), "nested/config.toml");

        let config = store.load().unwrap();

        assert_eq!(config.loader.delay_ms, 200);
        assert!(store.path().exists());
        let written: AppConfig = toml::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(written.loader, config.loader);
    }

    #[test]
    fn test_existing_file_is_read() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), "custom.toml");
        fs::write(store.path(), "[loader]\ndelay_ms = 75\n").unwrap();

        assert_eq!(store.load().unwrap().loader.delay_ms, 75);
    }

    #[test]
    fn test_malformed_file_falls_back_without_overwriting() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), "config.toml");
        fs::write(store.path(), "invalid_toml = [").unwrap();

        let config = store.load().unwrap();

        assert_eq!(config.loader.delay_ms, 200);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "invalid_toml = [");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), "config.toml");

        let mut config = AppConfig::default();
        config.loader.marker_class = "deferred".to_string();
        store.save(&config).unwrap();

        assert_eq!(store.load().unwrap().loader.marker_class, "deferred");
    }

    #[test]
    fn test_default_location_uses_config_file_name() {
        if let Ok(store) = ConfigStore::locate(None) {
            assert!(store.path().ends_with("config.toml"));
        }
    }
}
