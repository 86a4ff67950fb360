//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! API location, cache tuning and the last zone the user looked up.
//!
//! Configuration is stored at `~/.config/wastecal/config.json`. A few
//! settings can be overridden from the environment (see [`Config::apply_env`]).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::cache::freshness::DEFAULT_MAX_AGE_SECS;
use crate::models::ZoneCode;
use crate::utils::Language;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "wastecal";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const ENV_API_URL: &str = "WASTECAL_API_URL";
pub const ENV_CACHE_TTL_SECS: &str = "WASTECAL_CACHE_TTL_SECS";
pub const ENV_SINGLE_FLIGHT: &str = "WASTECAL_SINGLE_FLIGHT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub cache_max_age_secs: u64,
    pub request_timeout_secs: u64,
    /// Retries after HTTP 429 before reporting rate limiting. 0 = report at once.
    pub rate_limit_retries: u32,
    pub single_flight: bool,
    /// Keeps slot files of separate setups apart, e.g. staging vs. production.
    pub namespace: Option<String>,
    pub last_zone: Option<ZoneCode>,
    pub language: Language,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            cache_max_age_secs: DEFAULT_MAX_AGE_SECS as u64,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            rate_limit_retries: 0,
            single_flight: false,
            namespace: None,
            last_zone: None,
            language: Language::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any variable source. Unparseable values are
    /// logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_CACHE_TTL_SECS) {
            match raw.trim().parse() {
                Ok(secs) => self.cache_max_age_secs = secs,
                Err(_) => warn!(var = ENV_CACHE_TTL_SECS, value = %raw, "Ignoring invalid cache TTL"),
            }
        }
        if let Some(raw) = lookup(ENV_SINGLE_FLIGHT) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.single_flight = true,
                "0" | "false" | "no" | "off" => self.single_flight = false,
                _ => warn!(var = ENV_SINGLE_FLIGHT, value = %raw, "Ignoring invalid flag"),
            }
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;

        let mut path = cache_dir.join(APP_NAME);
        if let Some(ref ns) = self.namespace {
            path = path.join(ns);
        }
        Ok(path)
    }

    pub fn cache_max_age(&self) -> chrono::Duration {
        // chrono panics above i64::MAX milliseconds
        let secs = i64::try_from(self.cache_max_age_secs)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);
        chrono::Duration::seconds(secs)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.cache_max_age_secs, 300);
        assert_eq!(config.cache_max_age(), chrono::Duration::minutes(5));
        assert!(!config.single_flight);
        assert_eq!(config.language, Language::De);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");
        let config = Config {
            last_zone: Some(ZoneCode::parse("B1").unwrap()),
            language: Language::En,
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"api_base_url":"https://abfall.example.org","last_zone":"C2"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_base_url, "https://abfall.example.org");
        assert_eq!(config.last_zone.unwrap().as_str(), "C2");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_zone_in_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"last_zone":"Q7"}"#).unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_URL, " https://api.example.org "),
            (ENV_CACHE_TTL_SECS, "60"),
            (ENV_SINGLE_FLIGHT, "true"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_base_url, "https://api.example.org");
        assert_eq!(config.cache_max_age_secs, 60);
        assert!(config.single_flight);
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            ENV_CACHE_TTL_SECS => Some("five minutes".to_string()),
            ENV_SINGLE_FLIGHT => Some("maybe".to_string()),
            ENV_API_URL => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config, Config::default());
    }
}
