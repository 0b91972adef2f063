//! Object store trait

use crate::StoreResult;
use async_trait::async_trait;

/// Destination-side write interface
///
/// Implementations are stateless, thread-safe request issuers; the upload
/// aggregator shares one across its worker pool.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads a byte blob under the given key within a bucket
    ///
    /// A failed upload reports which key failed and why; it never carries
    /// partial state, so a retry by a future caller is safe.
    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> StoreResult<()>;
}
