use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fmt, fs, path::PathBuf, str::FromStr};

use crate::provider::weatherapi::DEFAULT_BASE_URL;

pub const API_KEY_ENV: &str = "WEATHER_API_KEY";
pub const MODE_ENV: &str = "WEATHER_MODE";

/// Whether fetch failures are masked with demo data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Production,
    Development,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Production => "production",
            RunMode::Development => "development",
        }
    }

    pub const fn all() -> &'static [RunMode] {
        &[RunMode::Production, RunMode::Development]
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "production" | "prod" => Ok(RunMode::Production),
            "development" | "dev" => Ok(RunMode::Development),
            _ => Err(anyhow!(
                "Unknown run mode '{value}'. Supported modes: production, development."
            )),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// mode = "development"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// WeatherAPI.com key. Not validated; a missing key fails remotely.
    pub api_key: Option<String>,

    /// Overrides the provider endpoint, e.g. for a local proxy.
    pub base_url: Option<String>,

    #[serde(default)]
    pub mode: RunMode,

    /// Where preferences are stored; defaults to the platform data directory.
    pub preferences_path: Option<PathBuf>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overlay `WEATHER_API_KEY` and `WEATHER_MODE` from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(env::var(API_KEY_ENV).ok(), env::var(MODE_ENV).ok())
    }

    fn apply_overrides(&mut self, api_key: Option<String>, mode: Option<String>) -> Result<()> {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }

        if let Some(mode) = mode {
            self.mode = mode.parse().with_context(|| format!("Invalid {MODE_ENV} value"))?;
        }

        Ok(())
    }

    /// API key, or an empty string when none is configured.
    pub fn api_key_or_empty(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_production_without_key() {
        let cfg = Config::default();

        assert_eq!(cfg.mode, RunMode::Production);
        assert!(!cfg.has_api_key());
        assert_eq!(cfg.api_key_or_empty(), "");
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn parses_toml_with_missing_fields() {
        let cfg = Config::from_toml("api_key = \"KEY\"").unwrap();

        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.mode, RunMode::Production);
        assert!(cfg.preferences_path.is_none());
    }

    #[test]
    fn toml_round_trip_keeps_mode() {
        let cfg = Config { mode: RunMode::Development, ..Config::default() };

        let text = toml::to_string_pretty(&cfg).unwrap();
        let back = Config::from_toml(&text).unwrap();

        assert_eq!(back.mode, RunMode::Development);
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut cfg = Config { api_key: Some("FILE".into()), ..Config::default() };

        cfg.apply_overrides(Some("ENV".into()), Some("dev".into())).unwrap();

        assert_eq!(cfg.api_key.as_deref(), Some("ENV"));
        assert_eq!(cfg.mode, RunMode::Development);
    }

    #[test]
    fn blank_env_key_does_not_clear_file_key() {
        let mut cfg = Config { api_key: Some("FILE".into()), ..Config::default() };

        cfg.apply_overrides(Some("  ".into()), None).unwrap();

        assert_eq!(cfg.api_key.as_deref(), Some("FILE"));
    }

    #[test]
    fn invalid_mode_is_reported() {
        let mut cfg = Config::default();
        let err = cfg.apply_overrides(None, Some("staging".into())).unwrap_err();

        assert!(err.to_string().contains(MODE_ENV));
    }

    #[test]
    fn run_mode_as_str_roundtrip() {
        for mode in RunMode::all() {
            let parsed: RunMode = mode.as_str().parse().expect("roundtrip should succeed");
            assert_eq!(*mode, parsed);
        }
    }
}
