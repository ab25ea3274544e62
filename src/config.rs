//! # Configuration Management Module
//!
//! Persistent application settings stored in platform-appropriate locations.
//! Handles loading, saving, and providing defaults for configuration options.
//!
//! ## Settings
//! - `server_url`: WebSocket endpoint of the inference backend
//! - `capture_interval_ms`: Period of the webcam capture loop
//! - `frame_width` / `frame_height`: Size frames are scaled to before sending
//! - `jpeg_quality`: JPEG quality (1-100) of outbound frames
//! - `camera_index`: Which webcam to open
//! - `data_dir`: Where the detection caches live (optional override)
//!
//! ## Storage Location
//! - macOS: ~/Library/Application Support/green-guardian/config.toml
//! - Linux: ~/.config/green-guardian/config.toml
//! - Windows: %APPDATA%\green-guardian\config.toml
//!
//! Every field is optional in the file; missing ones fall back to defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "green-guardian";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    pub capture_interval_ms: u64,
    pub frame_width: u32,
    pub frame_height: u32,
    pub jpeg_quality: u8,
    pub camera_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:49078/ws".to_string(),
            capture_interval_ms: 100,
            frame_width: 640,
            frame_height: 480,
            jpeg_quality: 80,
            camera_index: 0,
            data_dir: None,
        }
    }
}

impl Config {
    /// Get the path to the config file
    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Load config from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, or write and return the defaults if the file is missing
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config = toml::from_str(&contents).map_err(ConfigError::ParseFailed)?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.save_to(path)?;
                Ok(config)
            }
            Err(e) => Err(ConfigError::ReadFailed(e)),
        }
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::WriteFailed)?;
        }

        let toml_string = toml::to_string_pretty(self).map_err(ConfigError::SerializeFailed)?;
        fs::write(path, toml_string).map_err(ConfigError::WriteFailed)?;

        Ok(())
    }

    /// Directory holding the persisted detection caches
    pub fn cache_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR),
        }
    }

    pub fn capture_interval(&self) -> Duration {
        // A zero period would spin the capture thread
        Duration::from_millis(self.capture_interval_ms.max(1))
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality.clamp(1, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server_url, "ws://127.0.0.1:49078/ws");
        assert_eq!(config.capture_interval(), Duration::from_millis(100));
        assert_eq!((config.frame_width, config.frame_height), (640, 480));
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            server_url: "ws://10.0.0.118:49078/ws".to_string(),
            ..Config::default()
        };

        let toml_str = toml::to_string(&config).expect("Failed to serialize");
        assert!(toml_str.contains("server_url = \"ws://10.0.0.118:49078/ws\""));
        assert!(!toml_str.contains("data_dir"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml_str = r#"
            capture_interval_ms = 250
            jpeg_quality = 0
        "#;

        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");
        assert_eq!(config.capture_interval_ms, 250);
        assert_eq!(config.jpeg_quality(), 1);
        assert_eq!(config.server_url, Config::default().server_url);
        assert_eq!(config.frame_width, 640);
    }

    #[test]
    fn test_load_from_creates_default() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).expect("Failed to load config");
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let reloaded = Config::load_from(&path).expect("Failed to reload config");
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_load_from_rejects_garbage() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "server_url = [").expect("Failed to write");

        assert!(matches!(Config::load_from(&path), Err(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn test_cache_dir_override() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/green-guardian-test")),
            ..Config::default()
        };
        assert_eq!(config.cache_dir(), PathBuf::from("/tmp/green-guardian-test"));
    }
}
