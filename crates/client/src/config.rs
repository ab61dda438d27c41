//! Client configuration.
//!
//! Loaded from a TOML file; every section and key is optional.
//!
//! # Example
//!
//! ```toml
//! [server]
//! base_url = "https://events.example.org"
//! timeout_secs = 10
//!
//! [messages]
//! participant_found = "Participant found: "
//! confirm_prompt = "Are you sure?"
//! label_separator = "_c"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::endpoint::{Endpoints, DEFAULT_BASE_URL};
use crate::error::{ConfigError, VerifyError};

/// Environment variable overriding the configured base URL.
pub const BASE_URL_ENV: &str = "PODIUM_BASE_URL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub messages: Messages,
    pub logging: LoggingConfig,
}

/// `[server]`: where the verification endpoints live.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    /// Whole-request timeout. Absent means wait indefinitely.
    pub timeout_secs: Option<u64>,
}

/// `[messages]`: user-visible strings and label formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Messages {
    /// Prefix shown before the participant's name in the confirmation panel.
    pub participant_found: String,
    /// Text of the generic confirmation dialog.
    pub confirm_prompt: String,
    /// Joins the default payment label and the promo code id.
    pub label_separator: String,
}

impl Default for Messages {
    fn default() -> Self {
        Messages {
            participant_found: "Найден участник: ".to_string(),
            confirm_prompt: "Вы уверены?".to_string(),
            label_separator: "_c".to_string(),
        }
    }
}

/// `[logging]`: consumed by the binary that installs the subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `"info"` or `"warn,podium_client=debug"`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Human,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

impl ClientConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: ClientConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(content)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "server.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if let Some(base) = &self.server.base_url {
            Endpoints::new(base).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        Ok(())
    }

    /// Base URL by precedence: explicit override, then `PODIUM_BASE_URL`,
    /// then the file, then `http://localhost:8000`.
    pub fn resolve_base_url(&self, override_url: Option<&str>) -> String {
        if let Some(url) = override_url {
            return url.to_string();
        }
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                return url;
            }
        }
        self.server
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Endpoints for the resolved base URL.
    pub fn endpoints(&self, override_url: Option<&str>) -> Result<Endpoints, VerifyError> {
        Endpoints::new(&self.resolve_base_url(override_url))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.server.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ClientConfig::from_toml_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.messages.label_separator, "_c");
        assert_eq!(config.logging.format, LogFormat::Human);
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn full_file_parses() {
        let config = ClientConfig::from_toml_str(
            r#"
            [server]
            base_url = "https://events.example.org"
            timeout_secs = 5

            [messages]
            participant_found = "Found: "

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.server.base_url.as_deref(),
            Some("https://events.example.org")
        );
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.messages.participant_found, "Found: ");
        assert_eq!(config.messages.confirm_prompt, "Вы уверены?");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn override_wins_over_file() {
        let config = ClientConfig::from_toml_str(
            "[server]\nbase_url = \"https://file.example.org\"\n",
        )
        .unwrap();
        assert_eq!(
            config.resolve_base_url(Some("http://127.0.0.1:9000")),
            "http://127.0.0.1:9000"
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ClientConfig::from_toml_str("[server]\ntimeout_secs = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ClientConfig::from_toml_str("[server]\nbase_url = \"nope\"\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ClientConfig::from_toml_str("[server]\nport = 80\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("podium.toml");
        std::fs::write(&path, "[logging]\nformat = \"xml\"\n").unwrap();
        let err = ClientConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("podium.toml"));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            ClientConfig::load(&missing),
            Err(ConfigError::Read { .. })
        ));
    }
}
