//! Core job types

use crate::job::JobStatus;
use crate::store::StoreUri;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of work a job performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobKind {
    /// Crawl a site and retrieve raw HTML for every discovered page
    PageCrawl,
    /// Generate a single consolidated text extract for a site
    TextExtraction,
}

impl JobKind {
    /// Whether the provider supports cancelling jobs of this kind
    ///
    /// Text-extraction jobs cannot be cancelled remotely; a cancel request
    /// for them only stops local polling while the provider job keeps
    /// running. This is a provider API limitation, not something to mask.
    pub fn supports_cancellation(self) -> bool {
        matches!(self, JobKind::PageCrawl)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobKind::PageCrawl => "page-crawl",
            JobKind::TextExtraction => "text-extraction",
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Handle to a submitted job
///
/// Created at submission time and immutable thereafter; the provider is the
/// system of record for the job's status.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlJob {
    /// Opaque identifier issued by the provider
    pub id: String,

    /// What kind of work this job performs
    pub kind: JobKind,

    /// Target URL the job was submitted for
    pub url: String,

    /// Page/URL limit passed to the provider, if any
    pub limit: Option<u32>,

    /// When the job was submitted
    pub created_at: DateTime<Utc>,

    /// Object-store prefix results will be uploaded under
    pub destination: StoreUri,
}

impl CrawlJob {
    /// Builds a handle for a job that was submitted elsewhere
    ///
    /// Used by the status/wait/cancel entry points, which receive a job id
    /// from the caller rather than submitting themselves.
    pub fn attach(id: impl Into<String>, kind: JobKind, destination: StoreUri) -> Self {
        Self {
            id: id.into(),
            kind,
            url: String::new(),
            limit: None,
            created_at: Utc::now(),
            destination,
        }
    }
}

/// Point-in-time view of a job's provider-side state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Current lifecycle state
    pub status: JobStatus,

    /// URLs the provider has finished processing so far
    pub completed_urls: u64,

    /// Total URLs the provider has discovered for this job
    pub total_urls: u64,
}

impl StatusSnapshot {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            completed_urls: 0,
            total_urls: 0,
        }
    }
}

/// A single crawled page as returned by the provider
#[derive(Debug, Clone)]
pub struct PageResult {
    /// The page's URL
    pub url: String,

    /// Raw page payload, unmodified
    pub content: String,
}

/// Content retrieved for a completed job
#[derive(Debug, Clone)]
pub enum JobContent {
    /// One entry per crawled page (page-crawl jobs)
    Pages(Vec<PageResult>),

    /// The full extracted text payload (text-extraction jobs)
    Text(String),
}

impl JobContent {
    /// Number of distinct payloads this content will materialize into
    pub fn len(&self) -> usize {
        match self {
            JobContent::Pages(pages) => pages.len(),
            JobContent::Text(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            JobContent::Pages(pages) => pages.is_empty(),
            JobContent::Text(text) => text.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_support_is_asymmetric() {
        assert!(JobKind::PageCrawl.supports_cancellation());
        assert!(!JobKind::TextExtraction.supports_cancellation());
    }

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(JobKind::PageCrawl.as_str(), "page-crawl");
        assert_eq!(JobKind::TextExtraction.as_str(), "text-extraction");
    }

    #[test]
    fn test_content_len() {
        let pages = JobContent::Pages(vec![
            PageResult {
                url: "https://example.com/a".to_string(),
                content: "<html></html>".to_string(),
            },
            PageResult {
                url: "https://example.com/b".to_string(),
                content: "<html></html>".to_string(),
            },
        ]);
        assert_eq!(pages.len(), 2);

        let text = JobContent::Text("extract".to_string());
        assert_eq!(text.len(), 1);
        assert!(!text.is_empty());
    }
}
