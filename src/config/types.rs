//! Configuration types

/// Top-level configuration, passed explicitly into the supervisor
///
/// There is deliberately no process-wide configuration singleton; whoever
/// constructs the pipeline owns this object.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderConfig,
    pub store: StoreConfig,
    pub polling: PollingConfig,
}

/// Crawl provider connection settings
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API key for the crawl service
    pub api_key: String,

    /// Root URL of the crawl service API
    pub base_url: String,
}

/// Object store connection settings
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the store gateway
    pub endpoint: String,

    /// Optional bearer token for the store gateway
    pub token: Option<String>,
}

/// Polling and upload defaults, overridable per job
#[derive(Debug, Clone)]
pub struct PollingConfig {
    /// Seconds between status polls
    pub poll_interval_secs: u64,

    /// Wall-clock seconds before a blocking wait gives up
    pub deadline_secs: u64,

    /// Number of concurrent upload workers per job
    pub upload_concurrency: usize,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 30,
            deadline_secs: 3600,
            upload_concurrency: 4,
        }
    }
}
