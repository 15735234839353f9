//! Configuration loading and types

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sunsa_client::http::DEFAULT_BASE_URL;

/// Top-level configuration for the sunsa CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Account credentials
    #[serde(default)]
    pub account: AccountConfig,
    /// API endpoint settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

/// Account credentials from the Sunsa app
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Numeric user id
    pub user_id: Option<u64>,
    /// Public API key
    pub api_key: Option<String>,
}

/// API endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root URL the user id and method are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns error if the text is not valid configuration
    pub fn parse(content: &str) -> eyre::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Find a configuration file in the usual places
    ///
    /// `SUNSA_CONFIG` wins when set, whether or not the file exists.
    pub fn locate() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("SUNSA_CONFIG") {
            return Some(PathBuf::from(path));
        }

        let mut paths = vec![
            PathBuf::from("sunsa.toml"),
            PathBuf::from("/etc/sunsa/sunsa.toml"),
        ];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("sunsa/sunsa.toml"));
        }

        paths.into_iter().find(|path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert!(config.account.user_id.is_none());
        assert!(config.account.api_key.is_none());
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"
            [account]
            user_id = 1234
            api_key = "abc"

            [api]
            base_url = "http://localhost:9000/api/public/"

            [log]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.account.user_id, Some(1234));
        assert_eq!(config.account.api_key.as_deref(), Some("abc"));
        assert_eq!(config.api.base_url, "http://localhost:9000/api/public/");
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_invalid_config() {
        assert!(Config::parse("[account]\nuser_id = \"not a number\"").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Config::load(Path::new("/nonexistent/sunsa.toml")).is_err());
    }
}
