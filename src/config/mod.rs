//! Configuration module
//!
//! Configuration is read from the process environment once at startup.
//! Missing required variables fail fast with a descriptive error instead of
//! surfacing lazily on the first provider or store call.
//!
//! # Example
//!
//! ```no_run
//! use nethaul::config::Config;
//!
//! let config = Config::from_env().unwrap();
//! println!("Polling every {}s", config.polling.poll_interval_secs);
//! ```

mod env;
mod types;
mod validation;

pub use types::{Config, PollingConfig, ProviderConfig, StoreConfig};
