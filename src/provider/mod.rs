//! Crawl provider client
//!
//! Thin request/response binding to the external crawl service. The
//! provider is the system of record for job state; nothing is cached
//! between calls.

mod http;
mod traits;

pub use http::HttpCrawlProvider;
pub use traits::CrawlProvider;

use crate::job::JobKind;
use crate::{ProviderError, ProviderResult};

/// Range of URL counts the provider accepts for text-extraction jobs
pub const TEXT_EXTRACTION_LIMIT_RANGE: std::ops::RangeInclusive<u32> = 1..=100;

/// Validates submission parameters before any network call
///
/// Page-crawl jobs accept any positive limit (the provider applies its own
/// default when none is given); text-extraction jobs are constrained to the
/// provider's 1-100 URL cap.
pub fn validate_submission(kind: JobKind, url: &str, limit: Option<u32>) -> ProviderResult<()> {
    if url::Url::parse(url).is_err() {
        return Err(ProviderError::InvalidRequest(format!("invalid URL: {}", url)));
    }

    match (kind, limit) {
        (JobKind::TextExtraction, Some(n)) if !TEXT_EXTRACTION_LIMIT_RANGE.contains(&n) => {
            Err(ProviderError::InvalidRequest(format!(
                "text-extraction URL limit must be between {} and {}, got {}",
                TEXT_EXTRACTION_LIMIT_RANGE.start(),
                TEXT_EXTRACTION_LIMIT_RANGE.end(),
                n
            )))
        }
        (_, Some(0)) => Err(ProviderError::InvalidRequest(
            "limit must be positive".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_bad_url() {
        let err = validate_submission(JobKind::PageCrawl, "not a url", None).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRequest(_)));
    }

    #[test]
    fn test_validate_text_extraction_limit_range() {
        assert!(validate_submission(JobKind::TextExtraction, "https://example.com", Some(1)).is_ok());
        assert!(
            validate_submission(JobKind::TextExtraction, "https://example.com", Some(100)).is_ok()
        );

        let err = validate_submission(JobKind::TextExtraction, "https://example.com", Some(150))
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRequest(_)));

        let err = validate_submission(JobKind::TextExtraction, "https://example.com", Some(0))
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRequest(_)));
    }

    #[test]
    fn test_validate_page_crawl_is_unbounded() {
        assert!(validate_submission(JobKind::PageCrawl, "https://example.com", Some(5000)).is_ok());
        assert!(validate_submission(JobKind::PageCrawl, "https://example.com", None).is_ok());
    }
}
