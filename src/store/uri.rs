//! Destination URI parsing and key layout

use crate::{StoreError, StoreResult};
use serde::{Serialize, Serializer};

/// A validated `s3://bucket/prefix` destination
///
/// The prefix is stored without leading or trailing slashes; the canonical
/// string form always carries a trailing slash so job sub-paths append
/// cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreUri {
    bucket: String,
    prefix: String,
}

impl StoreUri {
    /// Parses and validates a destination URI
    ///
    /// # Arguments
    ///
    /// * `uri` - Destination in `s3://bucket/prefix` form
    ///
    /// # Returns
    ///
    /// * `Ok(StoreUri)` - Validated destination
    /// * `Err(StoreError::InvalidUri)` - Empty input, wrong scheme, or
    ///   missing bucket
    pub fn parse(uri: &str) -> StoreResult<Self> {
        if uri.is_empty() {
            return Err(StoreError::InvalidUri("store URI is required".to_string()));
        }

        let rest = uri
            .strip_prefix("s3://")
            .ok_or_else(|| StoreError::InvalidUri("store URI must start with 's3://'".to_string()))?;

        let (bucket, prefix) = match rest.split_once('/') {
            Some((bucket, prefix)) => (bucket, prefix.trim_matches('/')),
            None => (rest, ""),
        };

        if bucket.is_empty() {
            return Err(StoreError::InvalidUri("store URI is missing a bucket".to_string()));
        }

        Ok(Self {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Object key for a named blob belonging to a job
    ///
    /// Keys are laid out as `prefix/<job-id>/<name>` so concurrent jobs
    /// sharing a destination prefix never collide.
    pub fn key_for(&self, job_id: &str, name: &str) -> String {
        if self.prefix.is_empty() {
            format!("{}/{}", job_id, name)
        } else {
            format!("{}/{}/{}", self.prefix, job_id, name)
        }
    }

    /// The full destination URI for a job's upload set
    pub fn job_uri(&self, job_id: &str) -> String {
        format!("{}{}/", self, job_id)
    }
}

impl std::fmt::Display for StoreUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.prefix.is_empty() {
            write!(f, "s3://{}/", self.bucket)
        } else {
            write!(f, "s3://{}/{}/", self.bucket, self.prefix)
        }
    }
}

impl Serialize for StoreUri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl std::str::FromStr for StoreUri {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        Self::parse(s)
    }
}
