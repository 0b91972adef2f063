//! Environment loading

use crate::config::validation::validate;
use crate::config::{Config, PollingConfig, ProviderConfig, StoreConfig};
use crate::ConfigError;

pub const PROVIDER_API_KEY: &str = "NETHAUL_PROVIDER_API_KEY";
pub const PROVIDER_URL: &str = "NETHAUL_PROVIDER_URL";
pub const STORE_ENDPOINT: &str = "NETHAUL_STORE_ENDPOINT";
pub const STORE_TOKEN: &str = "NETHAUL_STORE_TOKEN";
pub const POLL_INTERVAL_SECS: &str = "NETHAUL_POLL_INTERVAL_SECS";
pub const DEADLINE_SECS: &str = "NETHAUL_DEADLINE_SECS";
pub const UPLOAD_CONCURRENCY: &str = "NETHAUL_UPLOAD_CONCURRENCY";

fn required(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

fn optional(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or_default<T: std::str::FromStr>(
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match optional(name) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
            name,
            reason: format!("'{}' is not a valid number", raw),
        }),
        None => Ok(default),
    }
}

impl Config {
    /// Loads and validates configuration from the process environment
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - All required variables present and valid
    /// * `Err(ConfigError)` - A required variable is missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = PollingConfig::default();

        let config = Config {
            provider: ProviderConfig {
                api_key: required(PROVIDER_API_KEY)?,
                base_url: required(PROVIDER_URL)?,
            },
            store: StoreConfig {
                endpoint: required(STORE_ENDPOINT)?,
                token: optional(STORE_TOKEN),
            },
            polling: PollingConfig {
                poll_interval_secs: parse_or_default(
                    POLL_INTERVAL_SECS,
                    defaults.poll_interval_secs,
                )?,
                deadline_secs: parse_or_default(DEADLINE_SECS, defaults.deadline_secs)?,
                upload_concurrency: parse_or_default(
                    UPLOAD_CONCURRENCY,
                    defaults.upload_concurrency,
                )?,
            },
        };

        validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-global; serialize tests that touch
    // them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_all() {
        for name in [
            PROVIDER_API_KEY,
            PROVIDER_URL,
            STORE_ENDPOINT,
            STORE_TOKEN,
            POLL_INTERVAL_SECS,
            DEADLINE_SECS,
            UPLOAD_CONCURRENCY,
        ] {
            std::env::remove_var(name);
        }
    }

    fn set_required() {
        std::env::set_var(PROVIDER_API_KEY, "test-key");
        std::env::set_var(PROVIDER_URL, "https://crawl.example.com");
        std::env::set_var(STORE_ENDPOINT, "https://store.example.com");
    }

    #[test]
    fn test_from_env_with_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        set_required();

        let config = Config::from_env().expect("config should load");
        assert_eq!(config.provider.api_key, "test-key");
        assert_eq!(config.polling.poll_interval_secs, 30);
        assert_eq!(config.polling.deadline_secs, 3600);
        assert_eq!(config.polling.upload_concurrency, 4);
        assert!(config.store.token.is_none());

        clear_all();
    }

    #[test]
    fn test_from_env_missing_key_fails_fast() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        std::env::set_var(PROVIDER_URL, "https://crawl.example.com");
        std::env::set_var(STORE_ENDPOINT, "https://store.example.com");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(PROVIDER_API_KEY)));

        clear_all();
    }

    #[test]
    fn test_from_env_overrides_and_bad_numbers() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        set_required();
        std::env::set_var(POLL_INTERVAL_SECS, "5");
        std::env::set_var(DEADLINE_SECS, "120");

        let config = Config::from_env().expect("config should load");
        assert_eq!(config.polling.poll_interval_secs, 5);
        assert_eq!(config.polling.deadline_secs, 120);

        std::env::set_var(POLL_INTERVAL_SECS, "soon");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { .. }));

        clear_all();
    }
}
