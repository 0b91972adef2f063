//! Crawl provider trait

use crate::job::{JobContent, JobKind, StatusSnapshot};
use crate::ProviderResult;
use async_trait::async_trait;

/// Request interface to the external crawl service
///
/// Implementations keep no local state between calls; every method is a
/// single outbound request.
#[async_trait]
pub trait CrawlProvider: Send + Sync {
    /// Submits a job and returns the provider-issued identifier
    ///
    /// Fails with `InvalidRequest` for a malformed URL or a limit outside
    /// the provider's accepted range, `Unavailable` on transient failure.
    async fn submit(&self, kind: JobKind, url: &str, limit: Option<u32>) -> ProviderResult<String>;

    /// Fetches a point-in-time status snapshot for a job
    ///
    /// Fails with `NotFound` if the identifier is unknown to the provider,
    /// `Unavailable` on transient failure.
    async fn fetch_status(&self, kind: JobKind, job_id: &str) -> ProviderResult<StatusSnapshot>;

    /// Retrieves the content set of a completed job
    ///
    /// Only valid once the job's status is `completed`; earlier calls fail
    /// with `JobNotReady`.
    async fn fetch_content(&self, kind: JobKind, job_id: &str) -> ProviderResult<JobContent>;

    /// Requests provider-side cancellation of a job
    ///
    /// Returns `Ok(true)` when the provider acknowledged the cancellation.
    /// For kinds the provider cannot cancel (text-extraction) this is a
    /// local no-op returning `Ok(false)`; the remote job keeps running.
    async fn cancel(&self, kind: JobKind, job_id: &str) -> ProviderResult<bool>;
}
