//! Layered configuration loading from the process environment

use std::io::Write;
use std::time::Duration;

use finboard::shared::config::{load, ENV_API_URL, ENV_CONFIG_PATH, ENV_TIMEOUT_SECS};
use finboard::shared::ConfigError;
use serial_test::serial;

use crate::{assert_err, assert_ok};

struct EnvGuard(&'static [&'static str]);

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in self.0 {
            std::env::remove_var(key);
        }
    }
}

const KEYS: &[&str] = &[ENV_API_URL, ENV_CONFIG_PATH, ENV_TIMEOUT_SECS];

#[test]
#[serial]
fn test_env_overrides_file() {
    let _guard = EnvGuard(KEYS);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "api_url = \"http://file.example/api\"\ntimeout_secs = 12").unwrap();

    std::env::set_var(ENV_CONFIG_PATH, file.path());
    std::env::set_var(ENV_API_URL, "https://env.example/api");

    let config = assert_ok!(load());
    assert_eq!(config.api_base_url.as_str(), "https://env.example/api/");
    assert_eq!(config.request_timeout, Duration::from_secs(12));
}

#[test]
#[serial]
fn test_bad_timeout_is_rejected() {
    let _guard = EnvGuard(KEYS);
    std::env::set_var(ENV_TIMEOUT_SECS, "soon");
    assert_err!(load(), ConfigError::MissingValue(_));
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    let _guard = EnvGuard(KEYS);
    std::env::set_var(ENV_CONFIG_PATH, "/nonexistent/finboard/config.toml");
    assert_err!(load(), ConfigError::Io(_));
}
