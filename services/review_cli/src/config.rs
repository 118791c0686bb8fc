//! services/review_cli/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use app_review_core::domain::{Platform, ViewMode};
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/app_review";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub default_platform: Platform,
    pub view_mode: ViewMode,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Backend Settings ---
        let api_base_url = lookup("REVIEW_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if api_base_url.is_empty() {
            return Err(ConfigError::MissingVar("REVIEW_API_BASE_URL".to_string()));
        }

        let timeout_str = lookup("REQUEST_TIMEOUT_SECS").unwrap_or_else(|| "30".to_string());
        let timeout_secs = timeout_str
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "REQUEST_TIMEOUT_SECS".to_string(),
                    format!("'{}' is not a positive number of seconds", timeout_str),
                )
            })?;

        // --- Session Defaults ---
        let default_platform = lookup("DEFAULT_PLATFORM")
            .map(|v| v.parse::<Platform>())
            .transpose()
            .map_err(|e| ConfigError::InvalidValue("DEFAULT_PLATFORM".to_string(), e))?
            .unwrap_or_default();

        let view_mode = lookup("VIEW_MODE")
            .map(|v| v.parse::<ViewMode>())
            .transpose()
            .map_err(|e| ConfigError::InvalidValue("VIEW_MODE".to_string(), e))?
            .unwrap_or_default();

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            default_platform,
            view_mode,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.default_platform, Platform::Android);
        assert_eq!(config.view_mode, ViewMode::Table);
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    fn values_are_parsed_and_base_url_trimmed() {
        let config = load(&[
            ("REVIEW_API_BASE_URL", "https://reviews.example.com/app_review/"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("DEFAULT_PLATFORM", "iOS"),
            ("VIEW_MODE", "cards"),
            ("RUST_LOG", "debug"),
        ])
        .unwrap();
        assert_eq!(config.api_base_url, "https://reviews.example.com/app_review");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.default_platform, Platform::Ios);
        assert_eq!(config.view_mode, ViewMode::Cards);
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            load(&[("REQUEST_TIMEOUT_SECS", "0")]),
            Err(ConfigError::InvalidValue(name, _)) if name == "REQUEST_TIMEOUT_SECS"
        ));
        assert!(matches!(
            load(&[("DEFAULT_PLATFORM", "windows")]),
            Err(ConfigError::InvalidValue(name, _)) if name == "DEFAULT_PLATFORM"
        ));
        assert!(matches!(
            load(&[("RUST_LOG", "loud")]),
            Err(ConfigError::InvalidValue(name, _)) if name == "RUST_LOG"
        ));
        assert!(matches!(
            load(&[("REVIEW_API_BASE_URL", "/")]),
            Err(ConfigError::MissingVar(_))
        ));
    }
}
