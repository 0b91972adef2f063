//! Upload aggregator
//!
//! Dispatches staged blobs to the object store with bounded parallelism,
//! records one outcome per blob, and assembles the final report. One blob's
//! failure never aborts the batch.

use crate::job::{JobStatus, StatusSnapshot};
use crate::pipeline::Blob;
use crate::store::{ObjectStore, StoreUri};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

/// Result of one upload attempt
///
/// Created and owned exclusively by the upload aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadOutcome {
    /// Object key the attempt targeted
    pub key: String,

    /// Bytes transferred (0 when the attempt failed before transfer)
    pub bytes: u64,

    /// Whether the store accepted the object
    pub success: bool,

    /// Error detail for failed attempts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Final, immutable summary of a job's materialization and upload outcome
///
/// All counts are derived by summing the recorded outcomes rather than
/// tracked independently, so `successful_uploads + failed_uploads ==
/// attempted_uploads` holds by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    /// Provider-issued job identifier
    pub job_id: String,

    /// Terminal status the job ended with
    pub status: JobStatus,

    /// Total URLs the provider discovered
    pub total_urls: u64,

    /// URLs the provider finished processing
    pub completed_urls: u64,

    /// Upload attempts made (exactly one per materialized blob)
    pub attempted_uploads: u64,

    /// Uploads the store accepted
    pub successful_uploads: u64,

    /// Uploads that failed
    pub failed_uploads: u64,

    /// Bytes accepted by the store
    pub uploaded_bytes: u64,

    /// Destination prefix actually used (job identifier appended)
    pub destination: String,

    /// Per-key detail for failed uploads
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<UploadOutcome>,
}

impl CrawlReport {
    /// Builds a report from the recorded upload outcomes
    pub fn from_outcomes(
        job_id: &str,
        snapshot: &StatusSnapshot,
        outcomes: Vec<UploadOutcome>,
        destination: String,
    ) -> Self {
        let attempted = outcomes.len() as u64;
        let successful = outcomes.iter().filter(|o| o.success).count() as u64;
        let uploaded_bytes = outcomes.iter().filter(|o| o.success).map(|o| o.bytes).sum();
        let failures: Vec<UploadOutcome> =
            outcomes.into_iter().filter(|o| !o.success).collect();

        Self {
            job_id: job_id.to_string(),
            status: snapshot.status,
            total_urls: snapshot.total_urls,
            completed_urls: snapshot.completed_urls,
            attempted_uploads: attempted,
            successful_uploads: successful,
            failed_uploads: failures.len() as u64,
            uploaded_bytes,
            destination,
            failures,
        }
    }

    /// Builds a zero-upload report for a terminal non-success state
    pub fn without_uploads(job_id: &str, status: JobStatus, destination: String) -> Self {
        Self {
            job_id: job_id.to_string(),
            status,
            total_urls: 0,
            completed_urls: 0,
            attempted_uploads: 0,
            successful_uploads: 0,
            failed_uploads: 0,
            uploaded_bytes: 0,
            destination,
            failures: Vec::new(),
        }
    }
}

/// Uploads every blob in the batch, recording one outcome each
///
/// Blobs are dispatched with at most `concurrency` uploads in flight;
/// completion order within the batch is not part of the contract. Every
/// blob gets exactly one attempt regardless of how its siblings fare.
pub async fn upload_batch(
    store: &dyn ObjectStore,
    blobs: &[Blob],
    destination: &StoreUri,
    job_id: &str,
    concurrency: usize,
) -> Vec<UploadOutcome> {
    let concurrency = concurrency.max(1);

    // Futures are built eagerly with owned captures so the batch stream
    // stays Send and the whole wait can run inside a spawned task.
    let uploads: Vec<_> = blobs
        .iter()
        .map(|blob| {
            let key = destination.key_for(job_id, &blob.name);
            let path = blob.path.clone();
            async move {
                let bytes = match tokio::fs::read(&path).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        return UploadOutcome {
                            key,
                            bytes: 0,
                            success: false,
                            error: Some(format!("failed to read staged blob: {}", e)),
                        }
                    }
                };
                let len = bytes.len() as u64;

                match store.put(destination.bucket(), &key, bytes).await {
                    Ok(()) => UploadOutcome {
                        key,
                        bytes: len,
                        success: true,
                        error: None,
                    },
                    Err(e) => {
                        tracing::warn!("Upload failed for {}: {}", key, e);
                        UploadOutcome {
                            key,
                            bytes: 0,
                            success: false,
                            error: Some(e.to_string()),
                        }
                    }
                }
            }
        })
        .collect();

    let outcomes: Vec<UploadOutcome> = stream::iter(uploads)
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let failed = outcomes.iter().filter(|o| !o.success).count();
    tracing::info!(
        "Job {}: uploaded {}/{} blobs to {}",
        job_id,
        outcomes.len() - failed,
        outcomes.len(),
        destination.job_uri(job_id)
    );

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ObjectStore;
    use crate::{StoreError, StoreResult};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory store that rejects keys containing a marker substring
    struct FlakyStore {
        reject_containing: Option<String>,
        keys: Mutex<Vec<String>>,
    }

    impl FlakyStore {
        fn healthy() -> Self {
            Self {
                reject_containing: None,
                keys: Mutex::new(Vec::new()),
            }
        }

        fn rejecting(marker: &str) -> Self {
            Self {
                reject_containing: Some(marker.to_string()),
                keys: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ObjectStore for FlakyStore {
        async fn put(&self, _bucket: &str, key: &str, _bytes: Vec<u8>) -> StoreResult<()> {
            if let Some(marker) = &self.reject_containing {
                if key.contains(marker.as_str()) {
                    return Err(StoreError::Upload {
                        key: key.to_string(),
                        message: "simulated store rejection".to_string(),
                    });
                }
            }
            self.keys.lock().unwrap().push(key.to_string());
            Ok(())
        }
    }

    fn stage_blobs(dir: &std::path::Path, names: &[&str]) -> Vec<Blob> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                std::fs::write(&path, format!("content of {}", name)).unwrap();
                Blob {
                    name: name.to_string(),
                    path,
                }
            })
            .collect()
    }

    #[tokio::test]
    async fn test_all_uploads_succeed() {
        let staging = tempfile::tempdir().unwrap();
        let blobs = stage_blobs(staging.path(), &["a.html", "b.html", "c.html"]);
        let store = FlakyStore::healthy();
        let destination = StoreUri::parse("s3://bucket/out").unwrap();

        let outcomes = upload_batch(&store, &blobs, &destination, "job-1", 4).await;
        let snapshot = StatusSnapshot {
            status: JobStatus::Completed,
            completed_urls: 3,
            total_urls: 3,
        };
        let report =
            CrawlReport::from_outcomes("job-1", &snapshot, outcomes, destination.job_uri("job-1"));

        assert_eq!(report.attempted_uploads, 3);
        assert_eq!(report.successful_uploads, 3);
        assert_eq!(report.failed_uploads, 0);
        assert!(report.uploaded_bytes > 0);
        assert_eq!(report.destination, "s3://bucket/out/job-1/");

        // Every key is scoped under the job id
        let keys = store.keys.lock().unwrap();
        assert_eq!(keys.len(), 3);
        for key in keys.iter() {
            assert!(key.starts_with("out/job-1/"), "unexpected key {}", key);
        }
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_batch() {
        let staging = tempfile::tempdir().unwrap();
        let blobs = stage_blobs(staging.path(), &["a.html", "bad.html", "c.html"]);
        let store = FlakyStore::rejecting("bad");
        let destination = StoreUri::parse("s3://bucket/out").unwrap();

        let outcomes = upload_batch(&store, &blobs, &destination, "job-2", 2).await;
        let snapshot = StatusSnapshot {
            status: JobStatus::Completed,
            completed_urls: 3,
            total_urls: 3,
        };
        let report =
            CrawlReport::from_outcomes("job-2", &snapshot, outcomes, destination.job_uri("job-2"));

        assert_eq!(report.attempted_uploads, 3);
        assert_eq!(report.successful_uploads, 2);
        assert_eq!(report.failed_uploads, 1);
        assert_eq!(
            report.successful_uploads + report.failed_uploads,
            report.attempted_uploads
        );

        // The failed outcome carries a non-empty error detail
        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert!(failure.key.contains("bad"));
        assert!(failure.error.as_deref().unwrap_or("").contains("rejection"));
    }

    #[tokio::test]
    async fn test_each_blob_uploaded_exactly_once() {
        let staging = tempfile::tempdir().unwrap();
        let names: Vec<String> = (0..20).map(|i| format!("page-{}.html", i)).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let blobs = stage_blobs(staging.path(), &name_refs);
        let store = FlakyStore::healthy();
        let destination = StoreUri::parse("s3://bucket/out").unwrap();

        let outcomes = upload_batch(&store, &blobs, &destination, "job-3", 8).await;

        assert_eq!(outcomes.len(), 20);
        let keys: HashSet<_> = outcomes.iter().map(|o| o.key.clone()).collect();
        assert_eq!(keys.len(), 20);
    }

    #[test]
    fn test_zero_report_for_non_success() {
        let report = CrawlReport::without_uploads("job-4", JobStatus::TimedOut, "s3://b/p/job-4/".to_string());
        assert_eq!(report.attempted_uploads, 0);
        assert_eq!(report.successful_uploads, 0);
        assert_eq!(report.failed_uploads, 0);
        assert_eq!(report.status, JobStatus::TimedOut);
    }
}
