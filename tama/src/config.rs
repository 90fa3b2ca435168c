//! Provider block resolution
//!
//! Every setting can come from the provider block or from the environment.
//! The block wins; empty strings count as unset.

use std::time::Duration;
use tfplug::types::{AttributePath, DynamicValue};
use thiserror::Error;
use url::Url;

pub const BASE_URL_ENV: &str = "TAMA_BASE_URL";
pub const API_KEY_ENV: &str = "TAMA_API_KEY";
pub const TIMEOUT_ENV: &str = "TAMA_TIMEOUT";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("base_url is required (set in provider config or TAMA_BASE_URL env var)")]
    MissingBaseUrl,

    #[error("api_key is required (set in provider config or TAMA_API_KEY env var)")]
    MissingApiKey,

    #[error("base_url must be an absolute http(s) URL, got {0:?}")]
    InvalidBaseUrl(String),

    #[error("timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Resolve the provider block, reporting every problem at once
    pub fn resolve(config: &DynamicValue) -> Result<Self, Vec<ConfigError>> {
        let mut errors = Vec::new();

        let base_url = match setting(config, "base_url", BASE_URL_ENV) {
            None => {
                errors.push(ConfigError::MissingBaseUrl);
                None
            }
            Some(raw) => match Url::parse(&raw) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => Some(raw),
                _ => {
                    errors.push(ConfigError::InvalidBaseUrl(raw));
                    None
                }
            },
        };

        let api_key = setting(config, "api_key", API_KEY_ENV);
        if api_key.is_none() {
            errors.push(ConfigError::MissingApiKey);
        }

        let timeout = match timeout(config) {
            Ok(timeout) => Some(timeout),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        match (base_url, api_key, timeout) {
            (Some(base_url), Some(api_key), Some(timeout)) if errors.is_empty() => Ok(Self {
                base_url,
                api_key,
                timeout,
            }),
            _ => Err(errors),
        }
    }
}

fn setting(config: &DynamicValue, name: &str, env: &str) -> Option<String> {
    config
        .get_optional_string(&AttributePath::new(name))
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var(env).ok().filter(|v| !v.is_empty()))
}

fn timeout(config: &DynamicValue) -> Result<Duration, ConfigError> {
    let seconds = match config.get_optional_number(&AttributePath::new("timeout")) {
        Some(n) => n,
        None => match std::env::var(TIMEOUT_ENV) {
            Ok(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?,
            _ => return Ok(DEFAULT_TIMEOUT),
        },
    };

    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(ConfigError::InvalidTimeout(seconds.to_string()));
    }
    Ok(Duration::from_secs_f64(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var(BASE_URL_ENV);
        std::env::remove_var(API_KEY_ENV);
        std::env::remove_var(TIMEOUT_ENV);
    }

    fn block(base_url: Option<&str>, api_key: Option<&str>) -> DynamicValue {
        let mut config = DynamicValue::object();
        if let Some(url) = base_url {
            config
                .set_string(&AttributePath::new("base_url"), url.to_string())
                .unwrap();
        }
        if let Some(key) = api_key {
            config
                .set_string(&AttributePath::new("api_key"), key.to_string())
                .unwrap();
        }
        config
    }

    #[test]
    #[serial]
    fn block_values_win_over_env() {
        clear_env();
        std::env::set_var(BASE_URL_ENV, "https://env.tama.example");
        std::env::set_var(API_KEY_ENV, "env-key");

        let config =
            ProviderConfig::resolve(&block(Some("https://api.tama.example"), Some("key"))).unwrap();

        assert_eq!(config.base_url, "https://api.tama.example");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        clear_env();
    }

    #[test]
    #[serial]
    fn env_fills_missing_values() {
        clear_env();
        std::env::set_var(BASE_URL_ENV, "https://env.tama.example");
        std::env::set_var(API_KEY_ENV, "env-key");
        std::env::set_var(TIMEOUT_ENV, "5");

        let config = ProviderConfig::resolve(&DynamicValue::object()).unwrap();

        assert_eq!(config.base_url, "https://env.tama.example");
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.timeout, Duration::from_secs(5));
        clear_env();
    }

    #[test]
    #[serial]
    fn empty_strings_count_as_missing() {
        clear_env();

        let errors = ProviderConfig::resolve(&block(Some(""), Some(""))).unwrap_err();

        assert_eq!(
            errors,
            vec![ConfigError::MissingBaseUrl, ConfigError::MissingApiKey]
        );
        assert_eq!(
            errors[0].to_string(),
            "base_url is required (set in provider config or TAMA_BASE_URL env var)"
        );
    }

    #[test]
    #[serial]
    fn rejects_relative_and_non_http_urls() {
        clear_env();

        let errors = ProviderConfig::resolve(&block(Some("tama.example"), Some("k"))).unwrap_err();
        assert!(matches!(errors[0], ConfigError::InvalidBaseUrl(_)));

        let errors =
            ProviderConfig::resolve(&block(Some("ftp://tama.example"), Some("k"))).unwrap_err();
        assert!(matches!(errors[0], ConfigError::InvalidBaseUrl(_)));
    }

    #[test]
    #[serial]
    fn timeout_must_be_positive() {
        clear_env();
        let mut config = block(Some("https://api.tama.example"), Some("k"));
        config
            .set_number(&AttributePath::new("timeout"), 0.0)
            .unwrap();

        let errors = ProviderConfig::resolve(&config).unwrap_err();
        assert_eq!(errors, vec![ConfigError::InvalidTimeout("0".to_string())]);
    }

    #[test]
    #[serial]
    fn unparsable_timeout_env_is_reported() {
        clear_env();
        std::env::set_var(TIMEOUT_ENV, "soon");

        let errors =
            ProviderConfig::resolve(&block(Some("https://api.tama.example"), Some("k"))).unwrap_err();
        assert_eq!(errors, vec![ConfigError::InvalidTimeout("soon".to_string())]);
        clear_env();
    }
}
