//! Layered configuration loading
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. TOML file at `$FINBOARD_CONFIG`, or `<config dir>/finboard/config.toml`
//! 3. Environment (`FINBOARD_API_URL`, `FINBOARD_TIMEOUT_SECS`)

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::{AppConfig, AppConfigBuilder, ConfigError};

/// Overrides the backend base URL
pub const ENV_API_URL: &str = "FINBOARD_API_URL";
/// Overrides the request timeout, in whole seconds
pub const ENV_TIMEOUT_SECS: &str = "FINBOARD_TIMEOUT_SECS";
/// Points at an explicit config file
pub const ENV_CONFIG_PATH: &str = "FINBOARD_CONFIG";

/// On-disk configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub login_path: Option<String>,
    pub public_paths: Option<Vec<String>>,
}

impl ConfigFile {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    fn apply(self, mut builder: AppConfigBuilder) -> AppConfigBuilder {
        if let Some(url) = self.api_url {
            builder = builder.api_url(url);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        if let Some(path) = self.login_path {
            builder = builder.login_path(path);
        }
        if let Some(paths) = self.public_paths {
            builder = builder.public_paths(paths);
        }
        builder
    }
}

/// Default location of the config file, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("finboard").join("config.toml"))
}

/// Load configuration from the process environment and the default file
pub fn load() -> Result<AppConfig, ConfigError> {
    let env = |key: &str| std::env::var(key).ok();
    let explicit = env(ENV_CONFIG_PATH).map(PathBuf::from);
    match explicit {
        // An explicitly named file must exist
        Some(path) => load_from(Some(&path), env),
        None => {
            let path = default_config_path().filter(|p| p.exists());
            load_from(path.as_deref(), env)
        }
    }
}

/// Load configuration from an optional file and an environment lookup
pub fn load_from<F>(file: Option<&Path>, env: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = AppConfig::builder();

    if let Some(path) = file {
        tracing::debug!(path = %path.display(), "loading config file");
        builder = ConfigFile::from_path(path)?.apply(builder);
    }

    if let Some(url) = env(ENV_API_URL) {
        builder = builder.api_url(url);
    }
    if let Some(raw) = env(ENV_TIMEOUT_SECS) {
        let secs: u64 = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::MissingValue("FINBOARD_TIMEOUT_SECS must be a number"))?;
        builder = builder.request_timeout(Duration::from_secs(secs));
    }

    builder.build()
}
