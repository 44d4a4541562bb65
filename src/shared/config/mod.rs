//! Application configuration module
//!
//! Provides the validated client configuration and its builder. Layered
//! loading from file and environment lives in [`loader`].

use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use crate::shared::error::ApiError;
use crate::shared::routes::{normalize_path, DEFAULT_PUBLIC_PATHS, LOGIN_PATH};

pub mod loader;

pub use loader::{load, ConfigFile, ENV_API_URL, ENV_CONFIG_PATH, ENV_TIMEOUT_SECS};

/// Default backend URL
pub const DEFAULT_API_URL: &str = "http://localhost:3002/api";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL every API path is joined onto; always ends with `/`
    pub api_base_url: Url,
    /// Page forced redirects land on
    pub login_path: String,
    /// Pages reachable without a session
    pub public_paths: Vec<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: parse_base_url(DEFAULT_API_URL).expect("default API URL is valid"),
            login_path: LOGIN_PATH.to_string(),
            public_paths: DEFAULT_PUBLIC_PATHS.iter().map(|p| p.to_string()).collect(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.api_base_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConfigError::InvalidUrl(format!(
                    "unsupported scheme '{}'",
                    other
                )))
            }
        }
        if !self.login_path.starts_with('/') {
            return Err(ConfigError::InvalidPath(self.login_path.clone()));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::MissingValue("request_timeout"));
        }
        Ok(())
    }

    /// Join an API path such as `/users/me` onto the base URL
    pub fn api_url(&self, path: &str) -> Result<Url, ApiError> {
        self.api_base_url
            .join(path.trim_start_matches('/'))
            .map_err(|_| ApiError::InvalidPath(path.to_string()))
    }

    /// Whether `path` is one of the configured public pages
    pub fn is_public(&self, path: &str) -> bool {
        let path = normalize_path(path);
        self.public_paths.iter().any(|p| p == path)
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    api_url: Option<String>,
    login_path: Option<String>,
    public_paths: Option<Vec<String>>,
    request_timeout: Option<Duration>,
}

impl AppConfigBuilder {
    /// Set the backend base URL
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Set the login page path
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = Some(path.into());
        self
    }

    /// Replace the list of public pages
    pub fn public_paths(mut self, paths: Vec<String>) -> Self {
        self.public_paths = Some(paths);
        self
    }

    /// Set the per-request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let api_base_url = match self.api_url {
            Some(raw) => parse_base_url(&raw)?,
            None => defaults.api_base_url,
        };
        let config = AppConfig {
            api_base_url,
            login_path: self.login_path.unwrap_or(defaults.login_path),
            public_paths: self.public_paths.unwrap_or(defaults.public_paths),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Parse a base URL, forcing a trailing slash so relative joins keep the prefix
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::MissingValue("api_url"));
    }
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&with_slash).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", raw, e)))
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
