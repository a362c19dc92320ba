//! Core `Config` struct and its YAML persistence.

use crate::defaults;
use crate::error::ConfigError;
use crate::types::{AllWindowsClosedAction, LogLevel};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Shell configuration, stored at `~/.config/webdesk/config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Page opened by new windows and used in place of invalid URLs
    #[serde(default = "defaults::default_url")]
    pub default_url: String,

    /// Width of newly opened windows (physical pixels)
    #[serde(default = "defaults::default_window_width")]
    pub default_window_width: u32,

    /// Height of newly opened windows (physical pixels)
    #[serde(default = "defaults::default_window_height")]
    pub default_window_height: u32,

    /// Title shown until the hosted page reports its own
    #[serde(default = "defaults::loading_window_title")]
    pub loading_window_title: String,

    /// Behavior once every window has closed
    #[serde(default)]
    pub all_windows_closed: AllWindowsClosedAction,

    /// Debug log verbosity
    #[serde(default)]
    pub log_level: LogLevel,

    /// Override for the persisted window-state file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_url: defaults::default_url(),
            default_window_width: defaults::default_window_width(),
            default_window_height: defaults::default_window_height(),
            loading_window_title: defaults::loading_window_title(),
            all_windows_closed: AllWindowsClosedAction::default(),
            log_level: LogLevel::default(),
            state_file: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        log::info!(
            "Config file not found, creating default at {:?}",
            config_path
        );
        let config = Self::default();
        if let Err(e) = config.save() {
            log::error!("Failed to save default config: {}", e);
            return Err(e);
        }
        log::info!("Default config created successfully");
        Ok(config)
    }

    /// Load and validate configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        log::info!("Loading existing config from {:?}", path);
        let contents = fs::read_to_string(path).map_err(ConfigError::from)?;
        let config: Config = serde_yaml_ng::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to a specific file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::from)?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::from)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(ConfigError::from)?;
        fs::rename(&temp_path, path).map_err(ConfigError::from)?;

        Ok(())
    }

    /// Check field values that serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_window_width == 0 || self.default_window_height == 0 {
            return Err(ConfigError::Validation(format!(
                "default window size must be non-zero (got {}x{})",
                self.default_window_width, self.default_window_height
            )));
        }
        let url = self.default_url.trim();
        if url.is_empty() || url == "about:blank" {
            return Err(ConfigError::Validation(format!(
                "default_url must be a loadable page (got {:?})",
                self.default_url
            )));
        }
        Ok(())
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("webdesk")
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("webdesk")
            } else {
                PathBuf::from(".")
            }
        }
    }

    /// Path of the persisted window-state store.
    pub fn state_file_path(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("window-state.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_url, "https://cad.onshape.com/");
        assert_eq!(config.default_window_width, 1200);
        assert_eq!(config.default_window_height, 800);
        assert_eq!(
            config.all_windows_closed,
            AllWindowsClosedAction::PlatformDefault
        );
        assert!(config.state_file.is_none());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "default_url: https://example.com/\nall_windows_closed: reset_and_reopen\n";
        let config: Config = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.default_url, "https://example.com/");
        assert_eq!(
            config.all_windows_closed,
            AllWindowsClosedAction::ResetAndReopen
        );
        assert_eq!(config.default_window_width, 1200);
        assert_eq!(config.log_level, LogLevel::Off);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("config.yaml");

        let config = Config {
            default_window_width: 1024,
            log_level: LogLevel::Debug,
            state_file: Some(temp.path().join("state.json")),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(!path.with_extension("yaml.tmp").exists());
    }

    #[test]
    fn test_load_corrupt_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "default_window_width: [[[").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_rejects_blank_default_url() {
        let config = Config {
            default_url: "about:blank".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validation_rejects_zero_size() {
        let config = Config {
            default_window_height: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_state_file_override() {
        let config = Config {
            state_file: Some(PathBuf::from("/tmp/custom.json")),
            ..Config::default()
        };
        assert_eq!(config.state_file_path(), PathBuf::from("/tmp/custom.json"));
        assert!(
            Config::default()
                .state_file_path()
                .ends_with("window-state.json")
        );
    }
}
