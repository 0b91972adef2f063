//! Job poller
//!
//! Drives a submitted job through status polling until a terminal state,
//! deadline, or cancellation. The sleep between polls is the pipeline's only
//! intentional suspension point.

use crate::job::{CrawlJob, JobStatus, StatusSnapshot};
use crate::pipeline::CancelFlag;
use crate::provider::CrawlProvider;
use crate::ProviderError;
use std::time::Duration;
use tokio::time::Instant;

/// Consecutive transient poll failures tolerated before the job is treated
/// as failed
const MAX_TRANSIENT_RETRIES: u32 = 3;

/// Polling parameters for one blocking wait
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Time between status checks
    pub interval: Duration,

    /// Wall-clock budget for the whole wait
    pub deadline: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            deadline: Duration::from_secs(3600),
        }
    }
}

/// How a poll loop ended
#[derive(Debug)]
pub enum PollOutcome {
    /// The job reached `completed`; the snapshot carries final counters
    Completed(StatusSnapshot),

    /// The job failed remotely, or transient errors exceeded the retry bound
    Failed {
        snapshot: Option<StatusSnapshot>,
        error: Option<String>,
    },

    /// The provider reported the job as cancelled, or the local flag was
    /// raised mid-poll
    Cancelled,

    /// The deadline elapsed before any terminal state; the remote job may
    /// still complete later but no handle to it is retained
    TimedOut,

    /// A non-retryable provider error (unknown job id, bad request)
    Aborted(ProviderError),
}

impl PollOutcome {
    /// Terminal status this outcome maps to in a report
    pub fn status(&self) -> JobStatus {
        match self {
            PollOutcome::Completed(_) => JobStatus::Completed,
            PollOutcome::Failed { .. } => JobStatus::Failed,
            PollOutcome::Cancelled => JobStatus::Cancelled,
            PollOutcome::TimedOut => JobStatus::TimedOut,
            PollOutcome::Aborted(_) => JobStatus::Failed,
        }
    }
}

/// Polls a job until it reaches a terminal state, the deadline passes, or
/// the cancel flag is raised
///
/// The flag is checked at every cycle boundary, and the inter-poll sleep
/// wakes early on cancellation so a cancel lands within one interval. The
/// flag only stops the local wait; whoever raised it owns any provider-side
/// cancellation. Timing out deliberately leaves the remote job running.
pub async fn poll_until_terminal(
    provider: &dyn CrawlProvider,
    job: &CrawlJob,
    config: &PollConfig,
    cancel: &CancelFlag,
) -> PollOutcome {
    let started = Instant::now();
    let mut consecutive_failures: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            tracing::info!("Job {}: wait cancelled, polling stopped", job.id);
            return PollOutcome::Cancelled;
        }

        if started.elapsed() > config.deadline {
            tracing::warn!(
                "Job {} exceeded deadline of {:?}; remote job left running",
                job.id,
                config.deadline
            );
            return PollOutcome::TimedOut;
        }

        match provider.fetch_status(job.kind, &job.id).await {
            Ok(snapshot) => {
                consecutive_failures = 0;
                tracing::debug!(
                    "Job {} status: {} ({}/{} urls)",
                    job.id,
                    snapshot.status,
                    snapshot.completed_urls,
                    snapshot.total_urls
                );

                match snapshot.status {
                    JobStatus::Completed => return PollOutcome::Completed(snapshot),
                    JobStatus::Failed => {
                        return PollOutcome::Failed {
                            snapshot: Some(snapshot),
                            error: None,
                        }
                    }
                    JobStatus::Cancelled => return PollOutcome::Cancelled,
                    // TimedOut is a local verdict, never reported remotely
                    JobStatus::TimedOut | JobStatus::Pending | JobStatus::Running => {}
                }
            }
            Err(ProviderError::Unavailable(message)) => {
                consecutive_failures += 1;
                if consecutive_failures > MAX_TRANSIENT_RETRIES {
                    tracing::error!(
                        "Job {}: provider unavailable {} times in a row, giving up: {}",
                        job.id,
                        consecutive_failures,
                        message
                    );
                    return PollOutcome::Failed {
                        snapshot: None,
                        error: Some(message),
                    };
                }
                tracing::warn!(
                    "Job {}: transient poll failure ({}/{}): {}",
                    job.id,
                    consecutive_failures,
                    MAX_TRANSIENT_RETRIES,
                    message
                );
            }
            Err(e) => return PollOutcome::Aborted(e),
        }

        // Park until the next cycle; a cancel wakes us early and is acted on
        // at the top of the loop.
        tokio::select! {
            _ = tokio::time::sleep(config.interval) => {}
            _ = cancel.cancelled() => {}
        }
    }
}
