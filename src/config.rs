//! Configuration module for dcmtree
//!
//! Manages the default projection and the value display budget.
//! Configuration is stored in the user's config directory and created with
//! defaults on first run.

use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::tree::{DEFAULT_VALUE_DISPLAY_LIMIT, SortMode};

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DcmTreeConfig {
    /// Projection used on startup when `--sort` is not given
    #[serde(default)]
    pub default_sort: SortMode,

    /// Maximum characters of a value rendered inline in a node label
    #[serde(default = "default_value_display_limit")]
    pub value_display_limit: usize,
}

const fn default_value_display_limit() -> usize {
    DEFAULT_VALUE_DISPLAY_LIMIT
}

impl Default for DcmTreeConfig {
    fn default() -> Self {
        Self {
            default_sort: SortMode::default(),
            value_display_limit: DEFAULT_VALUE_DISPLAY_LIMIT,
        }
    }
}

impl DcmTreeConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("dcmtree").join("config.toml"))
    }

    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the
    /// configuration cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let settings = Config::builder()
            .add_source(File::from(path.to_path_buf()).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let loaded = DcmTreeConfig::load_from(&path).unwrap();
        assert_eq!(loaded, DcmTreeConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = DcmTreeConfig {
            default_sort: SortMode::ByTagDiffOnly,
            value_display_limit: 40,
        };
        config.save_to(&path).unwrap();

        let loaded = DcmTreeConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_sort = \"by-tag\"\n").unwrap();

        let loaded = DcmTreeConfig::load_from(&path).unwrap();
        assert_eq!(loaded.default_sort, SortMode::ByTag);
        assert_eq!(loaded.value_display_limit, DEFAULT_VALUE_DISPLAY_LIMIT);
    }
}
