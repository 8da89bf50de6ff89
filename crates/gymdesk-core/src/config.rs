//! Configuration management for gymdesk

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Environment variable prefix, e.g. `GYMDESK_API__BASE_URL`
pub const ENV_PREFIX: &str = "GYMDESK";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Remote API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Session persistence configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Session persistence configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the token file
    #[serde(default = "default_session_directory")]
    pub directory: PathBuf,

    /// Storage key, used as the token file name
    #[serde(default = "default_session_key")]
    pub key: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

const fn default_request_timeout() -> u64 {
    30
}

fn default_session_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "gymdesk")
        .map_or_else(|| PathBuf::from(".gymdesk"), |dirs| dirs.config_dir().to_path_buf())
}

fn default_session_key() -> String {
    "token".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            directory: default_session_directory(),
            key: default_session_key(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SessionConfig {
    /// Full path of the token file
    #[must_use]
    pub fn token_path(&self) -> PathBuf {
        self.directory.join(&self.key)
    }
}

impl Config {
    /// Load configuration from an explicit file (required) or the default
    /// `gymdesk.toml` (optional), then overlay `GYMDESK_*` variables
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("gymdesk").required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check the values that would otherwise fail late
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(Error::configuration("api.base_url must not be empty"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::configuration(format!(
                "api.base_url must start with http:// or https://, got '{base_url}'"
            )));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(Error::configuration(
                "api.request_timeout_secs must be greater than zero",
            ));
        }
        if self.session.key.trim().is_empty() {
            return Err(Error::configuration("session.key must not be empty"));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(Error::configuration(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.session.key, "token");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_token_path_joins_key() {
        let session = SessionConfig {
            directory: PathBuf::from("/tmp/gymdesk"),
            key: "token".to_string(),
        };
        assert_eq!(session.token_path(), PathBuf::from("/tmp/gymdesk/token"));
    }

    #[test]
    fn test_partial_config_deserialization() {
        let json = r#"{ "api": { "base_url": "https://gym.example.com/api" } }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.api.base_url, "https://gym.example.com/api");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.session.key, "token");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.api.base_url = "ftp://gym".to_string();
        assert!(matches!(config.validate(), Err(Error::Configuration { .. })));

        let mut config = Config::default();
        config.api.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.session.key = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gymdesk.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            concat!(
                "[api]\nbase_url = \"http://127.0.0.1:9000\"\nrequest_timeout_secs = 5\n\n",
                "[session]\ndirectory = \"{}\"\n",
            ),
            dir.path().display()
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.api.request_timeout_secs, 5);
        assert_eq!(config.session.directory, dir.path());
        assert_eq!(config.session.key, "token");
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        match Config::load_from(Some(&missing)) {
            Err(Error::Configuration { .. }) => {}
            other => panic!("Expected configuration error, got {other:?}"),
        }
    }
}
