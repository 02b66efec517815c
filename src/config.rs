//! Application configuration module
//! Loads settings from defaults, an optional `thunder.toml` and `THUNDER__*`
//! environment variables, then validates them.

use config::{Config, Environment, File, Source};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_TOKEN_FILE: &str = ".thunder/session.json";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
    pub session: SessionConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log format options
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Plain,
}

/// Where the bearer token is kept between runs
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub token_file: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

impl AppConfig {
    /// Load configuration from `.env`, `thunder.toml` and the environment.
    ///
    /// `API_BASE_URL` is honoured as the default base URL;
    /// `THUNDER__API__BASE_URL` overrides it.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenv::dotenv().ok();

        let base_url =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        Self::load(
            &base_url,
            vec![
                Box::new(File::with_name("thunder").required(false)),
                Box::new(Environment::with_prefix("THUNDER").separator("__")),
            ],
        )
    }

    /// Build configuration from defaults plus the given sources, later
    /// sources overriding earlier ones.
    pub fn load(
        default_base_url: &str,
        sources: Vec<Box<dyn Source + Send + Sync>>,
    ) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("api.base_url", default_base_url)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "plain")?
            .set_default("session.token_file", DEFAULT_TOKEN_FILE)?
            .add_source(sources);

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.logging.validate()?;
        self.session.validate()?;

        Ok(())
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "api.base_url cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "api.base_url must start with http:// or https://".to_string(),
            ));
        }

        Ok(())
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.level.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "logging.level cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_file.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue(
                "session.token_file cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn toml(contents: &str) -> Box<dyn Source + Send + Sync> {
        Box::new(File::from_str(contents, FileFormat::Toml))
    }

    #[test]
    fn defaults_are_applied() {
        let config = AppConfig::load(DEFAULT_API_BASE_URL, vec![]).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Plain);
        assert_eq!(config.session.token_file, PathBuf::from(DEFAULT_TOKEN_FILE));
    }

    #[test]
    fn later_sources_override_defaults() {
        let config = AppConfig::load(
            DEFAULT_API_BASE_URL,
            vec![toml(
                r#"
                [api]
                base_url = "https://api.thunder.example/v1"

                [logging]
                format = "json"
                "#,
            )],
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://api.thunder.example/v1");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn rejects_base_url_without_scheme() {
        let result = AppConfig::load("api.thunder.example", vec![]);
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn rejects_unknown_log_format() {
        let result = AppConfig::load(
            DEFAULT_API_BASE_URL,
            vec![toml("[logging]\nformat = \"xml\"\n")],
        );
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
