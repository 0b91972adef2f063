//! Job supervisor
//!
//! Coordinates poller, materializer, and upload aggregator for a single job
//! invocation, and is the only component the tool-calling layer drives
//! directly. Each job's lifecycle runs as an independent unit of work; the
//! only state shared across jobs is the pair of stateless clients and a
//! registry of in-flight cancel flags.

use crate::config::{Config, PollingConfig};
use crate::job::{CrawlJob, JobKind, JobStatus, StatusSnapshot};
use crate::pipeline::{
    materialize, poll_until_terminal, upload_batch, CancelFlag, CrawlReport, PollConfig,
    PollOutcome,
};
use crate::provider::{CrawlProvider, HttpCrawlProvider};
use crate::store::{HttpObjectStore, ObjectStore, StoreUri};
use crate::{NethaulError, Result};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Acknowledgement returned by `cancel`
///
/// `provider_cancelled` reports whether the provider itself acknowledged the
/// cancellation; for text-extraction jobs it is always `false` and the note
/// spells out that the remote job keeps running.
#[derive(Debug, Clone, Serialize)]
pub struct CancelAck {
    pub job_id: String,
    pub kind: JobKind,

    /// An in-flight blocking wait was signalled to stop
    pub local_wait_cancelled: bool,

    /// The provider acknowledged a remote cancellation
    pub provider_cancelled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Orchestration root for crawl jobs
pub struct Supervisor {
    provider: Arc<dyn CrawlProvider>,
    store: Arc<dyn ObjectStore>,
    polling: PollingConfig,
    in_flight: Mutex<HashMap<String, CancelFlag>>,
}

impl Supervisor {
    /// Creates a supervisor over explicit provider and store clients
    pub fn new(
        provider: Arc<dyn CrawlProvider>,
        store: Arc<dyn ObjectStore>,
        polling: PollingConfig,
    ) -> Self {
        Self {
            provider,
            store,
            polling,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a supervisor with HTTP clients built from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = HttpCrawlProvider::new(&config.provider.base_url, &config.provider.api_key)
            .map_err(|e| crate::ProviderError::Unavailable(e.to_string()))?;
        let store = HttpObjectStore::new(&config.store.endpoint, config.store.token.clone())
            .map_err(|e| crate::StoreError::Upload {
                key: String::new(),
                message: e.to_string(),
            })?;

        Ok(Self::new(
            Arc::new(provider),
            Arc::new(store),
            config.polling.clone(),
        ))
    }

    /// Default poll parameters from configuration, with per-call overrides
    fn poll_config(&self, interval: Option<u64>, deadline: Option<u64>) -> PollConfig {
        PollConfig {
            interval: Duration::from_secs(interval.unwrap_or(self.polling.poll_interval_secs)),
            deadline: Duration::from_secs(deadline.unwrap_or(self.polling.deadline_secs)),
        }
    }

    /// Submits a job and returns immediately with its handle
    ///
    /// Does not block on completion; pair with `wait_for_completion` (or
    /// `check_status` probes) to follow the job.
    pub async fn start_crawl(
        &self,
        kind: JobKind,
        url: &str,
        destination: StoreUri,
        limit: Option<u32>,
    ) -> Result<CrawlJob> {
        let id = self.provider.submit(kind, url, limit).await?;

        let job = CrawlJob {
            id,
            kind,
            url: url.to_string(),
            limit,
            created_at: Utc::now(),
            destination,
        };

        tracing::info!(
            "Started {} job {}; results will land under {}",
            kind,
            job.id,
            job.destination.job_uri(&job.id)
        );
        Ok(job)
    }

    /// Single non-blocking status probe
    ///
    /// Independent of any in-progress blocking wait on the same job.
    pub async fn check_status(&self, kind: JobKind, job_id: &str) -> Result<StatusSnapshot> {
        Ok(self.provider.fetch_status(kind, job_id).await?)
    }

    /// Runs the job to a terminal state and delivers its content
    ///
    /// On `completed`, stages and uploads every blob and reports the
    /// aggregate. On `failed`/`timed_out`/`cancelled` the returned report
    /// carries that status with zero upload counts instead of raising, so
    /// callers always receive a structured result. Unknown-job and
    /// invalid-request errors still propagate as errors.
    pub async fn wait_for_completion(
        &self,
        job: &CrawlJob,
        poll_interval_secs: Option<u64>,
        deadline_secs: Option<u64>,
    ) -> Result<CrawlReport> {
        let poll_config = self.poll_config(poll_interval_secs, deadline_secs);
        let cancel = self.register(&job.id);

        let result = self.run_job(job, &poll_config, &cancel).await;

        self.unregister(&job.id);
        result
    }

    async fn run_job(
        &self,
        job: &CrawlJob,
        poll_config: &PollConfig,
        cancel: &CancelFlag,
    ) -> Result<CrawlReport> {
        let destination = job.destination.job_uri(&job.id);
        let outcome = poll_until_terminal(self.provider.as_ref(), job, poll_config, cancel).await;

        let snapshot = match outcome {
            PollOutcome::Completed(snapshot) => snapshot,
            PollOutcome::Failed { snapshot, error } => {
                if let Some(message) = error {
                    tracing::error!("Job {} failed: {}", job.id, message);
                }
                let mut report =
                    CrawlReport::without_uploads(&job.id, JobStatus::Failed, destination);
                if let Some(snapshot) = snapshot {
                    report.total_urls = snapshot.total_urls;
                    report.completed_urls = snapshot.completed_urls;
                }
                return Ok(report);
            }
            PollOutcome::Cancelled => {
                return Ok(CrawlReport::without_uploads(
                    &job.id,
                    JobStatus::Cancelled,
                    destination,
                ))
            }
            PollOutcome::TimedOut => {
                return Ok(CrawlReport::without_uploads(
                    &job.id,
                    JobStatus::TimedOut,
                    destination,
                ))
            }
            PollOutcome::Aborted(e) => return Err(e.into()),
        };

        let content = self
            .provider
            .fetch_content(job.kind, &job.id)
            .await
            .map_err(|e| NethaulError::MaterializationFailed {
                job_id: job.id.clone(),
                message: e.to_string(),
            })?;

        if content.is_empty() {
            tracing::warn!("Job {} completed but returned no content", job.id);
        } else {
            tracing::debug!("Job {} returned {} payloads", job.id, content.len());
        }

        // Staging lives in a per-job temp directory, released unconditionally
        // when this scope ends, whether the batch succeeded or not.
        let staging = tempfile::tempdir()?;
        let blobs = materialize(&job.id, &content, staging.path())?;

        let outcomes = upload_batch(
            self.store.as_ref(),
            &blobs,
            &job.destination,
            &job.id,
            self.polling.upload_concurrency,
        )
        .await;

        Ok(CrawlReport::from_outcomes(
            &job.id,
            &snapshot,
            outcomes,
            destination,
        ))
    }

    /// Cancels a job
    ///
    /// Signals any in-flight blocking wait to stop, and requests
    /// provider-side cancellation when the job kind supports it. For
    /// text-extraction jobs the call is accepted for surface symmetry but
    /// the acknowledgement states that the provider job continues.
    pub async fn cancel(&self, kind: JobKind, job_id: &str) -> Result<CancelAck> {
        let local_wait_cancelled = {
            let in_flight = self.in_flight.lock().unwrap();
            if let Some(flag) = in_flight.get(job_id) {
                flag.cancel();
                true
            } else {
                false
            }
        };

        let (provider_cancelled, note) = if kind.supports_cancellation() {
            match self.provider.cancel(kind, job_id).await {
                Ok(acked) => (acked, None),
                Err(e) => (false, Some(format!("provider cancel request failed: {}", e))),
            }
        } else {
            (
                false,
                Some(
                    "the provider cannot cancel text-extraction jobs; \
                     the remote job continues to completion"
                        .to_string(),
                ),
            )
        };

        Ok(CancelAck {
            job_id: job_id.to_string(),
            kind,
            local_wait_cancelled,
            provider_cancelled,
            note,
        })
    }

    fn register(&self, job_id: &str) -> CancelFlag {
        let mut in_flight = self.in_flight.lock().unwrap();
        in_flight
            .entry(job_id.to_string())
            .or_insert_with(CancelFlag::new)
            .clone()
    }

    fn unregister(&self, job_id: &str) {
        self.in_flight.lock().unwrap().remove(job_id);
    }
}
