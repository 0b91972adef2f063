//! Configuration validation

use crate::config::env::{
    DEADLINE_SECS, POLL_INTERVAL_SECS, PROVIDER_URL, STORE_ENDPOINT, UPLOAD_CONCURRENCY,
};
use crate::config::Config;
use crate::ConfigError;

/// Upper bound on the per-job upload worker pool
const MAX_UPLOAD_CONCURRENCY: usize = 16;

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if url::Url::parse(&config.provider.base_url).is_err() {
        return Err(ConfigError::InvalidVar {
            name: PROVIDER_URL,
            reason: format!("'{}' is not a valid URL", config.provider.base_url),
        });
    }

    if url::Url::parse(&config.store.endpoint).is_err() {
        return Err(ConfigError::InvalidVar {
            name: STORE_ENDPOINT,
            reason: format!("'{}' is not a valid URL", config.store.endpoint),
        });
    }

    if config.polling.poll_interval_secs == 0 {
        return Err(ConfigError::InvalidVar {
            name: POLL_INTERVAL_SECS,
            reason: "poll interval must be at least 1 second".to_string(),
        });
    }

    if config.polling.deadline_secs == 0 {
        return Err(ConfigError::InvalidVar {
            name: DEADLINE_SECS,
            reason: "deadline must be at least 1 second".to_string(),
        });
    }

    if config.polling.upload_concurrency == 0
        || config.polling.upload_concurrency > MAX_UPLOAD_CONCURRENCY
    {
        return Err(ConfigError::InvalidVar {
            name: UPLOAD_CONCURRENCY,
            reason: format!(
                "upload concurrency must be between 1 and {}",
                MAX_UPLOAD_CONCURRENCY
            ),
        });
    }

    Ok(())
}
