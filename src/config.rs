//! Configuration management for Betamax
//!
//! Handles config file loading/saving, the API endpoint and the device id
//! sent with sign-in. Config is stored at ~/.config/betamax/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::VideoQuality;

/// API used when neither the environment nor the config file names one
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Betamax API base URL
    pub api_url: Option<String>,
    /// Cached device identifier sent as `imei` on sign-in
    pub imei: Option<String>,
    /// Preferred stream quality (sd, hd, fhd)
    pub video_quality: Option<VideoQuality>,
    /// Preferred local player (vlc, mpv)
    pub player: Option<String>,
    #[serde(skip)]
    pub(crate) path: Option<PathBuf>,
}

impl Config {
    /// Get default config file path (~/.config/betamax/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("betamax").join("config.toml"))
    }

    /// Load config from the default location, or return default if not found
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(path),
            None => Self::default(),
        }
    }

    /// Load config from `path`; a missing or unreadable file yields defaults
    pub fn load_from(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut config: Self = std::fs::read_to_string(&path)
            .ok()
            .and_then(|s| match toml::from_str(&s) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                    None
                }
            })
            .unwrap_or_default();
        config.path = Some(path);
        config
    }

    /// Where this config is saved
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = self
            .path
            .clone()
            .or_else(Self::default_path)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Get API base URL with fallback chain:
    /// 1. Environment variable BETAMAX_API_URL
    /// 2. Config file
    /// 3. Built-in default
    pub fn api_url(&self) -> String {
        if let Ok(url) = std::env::var("BETAMAX_API_URL") {
            if !url.is_empty() {
                return url;
            }
        }

        self.api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Get device id with fallback chain:
    /// 1. Environment variable BETAMAX_IMEI
    /// 2. Cached id from config file
    /// 3. Freshly generated id (and cache it)
    pub fn imei(&mut self) -> String {
        if let Ok(imei) = std::env::var("BETAMAX_IMEI") {
            if !imei.is_empty() {
                return imei;
            }
        }

        if let Some(ref imei) = self.imei {
            return imei.clone();
        }

        let imei = Self::generate_device_id();
        self.imei = Some(imei.clone());
        if let Err(e) = self.save() {
            tracing::debug!(error = %e, "could not cache generated device id");
        }
        imei
    }

    pub fn video_quality(&self) -> VideoQuality {
        self.video_quality.unwrap_or_default()
    }

    /// Random device id for installs without one
    pub fn generate_device_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.api_url.is_none());
        assert!(config.imei.is_none());
        assert_eq!(config.video_quality(), VideoQuality::Hd);
    }

    #[test]
    fn test_generate_device_id() {
        let id = Config::generate_device_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, Config::generate_device_id());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::load_from(&path);
        assert_eq!(config.path(), Some(path.as_path()));
        config.api_url = Some("http://tv.test/api".to_string());
        config.video_quality = Some(VideoQuality::Fhd);
        config.player = Some("mpv".to_string());
        config.save().unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded.api_url.as_deref(), Some("http://tv.test/api"));
        assert_eq!(loaded.video_quality(), VideoQuality::Fhd);
        assert_eq!(loaded.player.as_deref(), Some("mpv"));
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "video_quality = 12").unwrap();

        let config = Config::load_from(&path);
        assert!(config.video_quality.is_none());
    }

    #[test]
    fn test_quality_serializes_lowercase() {
        let config = Config {
            video_quality: Some(VideoQuality::Sd),
            ..Config::default()
        };
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("video_quality = \"sd\""));
    }
}
