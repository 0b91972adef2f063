//! Nethaul: crawl-job orchestration into object storage
//!
//! This crate drives asynchronous crawl and text-extraction jobs against an
//! external crawl provider, polls them to completion under a deadline,
//! stages the resulting content locally, and uploads it to object storage
//! with per-object failure accounting.

pub mod config;
pub mod job;
pub mod pipeline;
pub mod provider;
pub mod store;

use thiserror::Error;

/// Main error type for nethaul operations
#[derive(Debug, Error)]
pub enum NethaulError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Object store error: {0}")]
    Store(#[from] StoreError),

    #[error("Materialization failed for job {job_id}: {message}")]
    MaterializationFailed { job_id: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// Raised once at startup; a missing or malformed variable fails fast rather
/// than surfacing lazily on first use.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    InvalidVar { name: &'static str, reason: String },
}

/// Errors from the crawl provider client
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Bad parameters (malformed URL, limit out of the provider's range).
    /// Never retried.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Transient network or service failure. Retried a bounded number of
    /// times at the polling cadence before being escalated.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// The provider does not know this job identifier. Never retried.
    #[error("Unknown job: {job_id}")]
    NotFound { job_id: String },

    /// Content was requested before the job reached `completed`.
    #[error("Job {job_id} is not ready; content is only available once completed")]
    JobNotReady { job_id: String },

    /// The provider answered with an error payload or an unexpected body.
    #[error("Provider API error: {0}")]
    Api(String),
}

/// Errors from the object store client
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid store URI: {0}")]
    InvalidUri(String),

    #[error("Upload failed for {key}: {message}")]
    Upload { key: String, message: String },
}

/// Result type alias for nethaul operations
pub type Result<T> = std::result::Result<T, NethaulError>;

/// Result type alias for provider operations
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Result type alias for object store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// Re-export commonly used types
pub use config::Config;
pub use job::{CrawlJob, JobKind, JobStatus, StatusSnapshot};
pub use pipeline::{CancelFlag, CrawlReport, Supervisor};
pub use store::StoreUri;
