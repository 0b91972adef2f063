//! HTTP crawl provider binding
//!
//! Endpoints follow the crawl service's v1 REST layout:
//! - `POST /v1/crawl`, `GET /v1/crawl/{id}`, `GET /v1/crawl/{id}/content`,
//!   `DELETE /v1/crawl/{id}` for page-crawl jobs
//! - the `/v1/extract` family for text-extraction jobs (no DELETE; the
//!   service cannot cancel those)

use crate::job::{JobContent, JobKind, JobStatus, PageResult, StatusSnapshot};
use crate::provider::{validate_submission, CrawlProvider};
use crate::{ProviderError, ProviderResult};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for the crawl service's HTTP API
pub struct HttpCrawlProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct SubmitCrawlBody<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    formats: &'a [&'a str],
}

#[derive(Serialize)]
struct SubmitExtractBody<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_urls: Option<u32>,
}

#[derive(Deserialize)]
struct SubmitResponse {
    id: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    completed: u64,
    #[serde(default)]
    total: u64,
}

#[derive(Deserialize)]
struct PageBody {
    html: Option<String>,
    #[serde(default)]
    metadata: PageMetadata,
}

#[derive(Deserialize, Default)]
struct PageMetadata {
    url: Option<String>,
}

#[derive(Deserialize)]
struct CrawlContentResponse {
    #[serde(default)]
    data: Vec<PageBody>,
}

#[derive(Deserialize)]
struct ExtractContentResponse {
    data: ExtractData,
}

#[derive(Deserialize)]
struct ExtractData {
    text: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
}

impl HttpCrawlProvider {
    /// Creates a provider client
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root of the crawl service API
    /// * `api_key` - Bearer token attached to every request
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// URL family segment for a job kind
    fn family(kind: JobKind) -> &'static str {
        match kind {
            JobKind::PageCrawl => "crawl",
            JobKind::TextExtraction => "extract",
        }
    }

    /// Extracts the service's error message from a non-success response
    async fn error_message(response: Response) -> String {
        let status = response.status();
        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_default();
        if message.is_empty() {
            format!("HTTP {}", status)
        } else {
            message
        }
    }

    /// Maps response status codes shared by all endpoints
    async fn check_common(job_id: &str, response: Response) -> ProviderResult<Response> {
        match response.status() {
            StatusCode::NOT_FOUND => Err(ProviderError::NotFound {
                job_id: job_id.to_string(),
            }),
            StatusCode::CONFLICT => Err(ProviderError::JobNotReady {
                job_id: job_id.to_string(),
            }),
            status if status.is_server_error() => {
                Err(ProviderError::Unavailable(Self::error_message(response).await))
            }
            status if !status.is_success() => {
                Err(ProviderError::Api(Self::error_message(response).await))
            }
            _ => Ok(response),
        }
    }

    fn transport_error(e: reqwest::Error) -> ProviderError {
        // Timeouts and connection failures are transient; the poller retries
        // them at its cadence.
        ProviderError::Unavailable(e.to_string())
    }
}

#[async_trait]
impl CrawlProvider for HttpCrawlProvider {
    async fn submit(&self, kind: JobKind, url: &str, limit: Option<u32>) -> ProviderResult<String> {
        validate_submission(kind, url, limit)?;

        let endpoint = format!("{}/v1/{}", self.base_url, Self::family(kind));
        let request = self.client.post(&endpoint).bearer_auth(&self.api_key);

        let response = match kind {
            JobKind::PageCrawl => {
                request
                    .json(&SubmitCrawlBody {
                        url,
                        limit,
                        formats: &["html"],
                    })
                    .send()
                    .await
            }
            JobKind::TextExtraction => {
                request
                    .json(&SubmitExtractBody {
                        url,
                        max_urls: limit,
                    })
                    .send()
                    .await
            }
        }
        .map_err(Self::transport_error)?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(ProviderError::InvalidRequest(
                Self::error_message(response).await,
            ));
        }
        if status.is_server_error() {
            return Err(ProviderError::Unavailable(Self::error_message(response).await));
        }
        if !status.is_success() {
            return Err(ProviderError::Api(Self::error_message(response).await));
        }

        let body: SubmitResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Api(format!("malformed submit response: {}", e)))?;

        tracing::info!("Submitted {} job {} for {}", kind, body.id, url);
        Ok(body.id)
    }

    async fn fetch_status(&self, kind: JobKind, job_id: &str) -> ProviderResult<StatusSnapshot> {
        let endpoint = format!("{}/v1/{}/{}", self.base_url, Self::family(kind), job_id);
        let response = self
            .client
            .get(&endpoint)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let response = Self::check_common(job_id, response).await?;
        let body: StatusResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Api(format!("malformed status response: {}", e)))?;

        Ok(StatusSnapshot {
            status: JobStatus::parse_provider(&body.status),
            completed_urls: body.completed,
            total_urls: body.total,
        })
    }

    async fn fetch_content(&self, kind: JobKind, job_id: &str) -> ProviderResult<JobContent> {
        let endpoint = format!(
            "{}/v1/{}/{}/content",
            self.base_url,
            Self::family(kind),
            job_id
        );
        let response = self
            .client
            .get(&endpoint)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let response = Self::check_common(job_id, response).await?;

        match kind {
            JobKind::PageCrawl => {
                let body: CrawlContentResponse = response
                    .json()
                    .await
                    .map_err(|e| ProviderError::Api(format!("malformed content response: {}", e)))?;

                // Pages without an HTML payload are skipped, matching the
                // provider's own accounting of completed URLs.
                let pages = body
                    .data
                    .into_iter()
                    .enumerate()
                    .filter_map(|(i, page)| {
                        let content = page.html?;
                        let url = page
                            .metadata
                            .url
                            .unwrap_or_else(|| format!("page-{}", i));
                        Some(PageResult { url, content })
                    })
                    .collect();

                Ok(JobContent::Pages(pages))
            }
            JobKind::TextExtraction => {
                let body: ExtractContentResponse = response
                    .json()
                    .await
                    .map_err(|e| ProviderError::Api(format!("malformed content response: {}", e)))?;
                Ok(JobContent::Text(body.data.text))
            }
        }
    }

    async fn cancel(&self, kind: JobKind, job_id: &str) -> ProviderResult<bool> {
        if !kind.supports_cancellation() {
            tracing::warn!(
                "Provider cannot cancel {} jobs; job {} continues remotely",
                kind,
                job_id
            );
            return Ok(false);
        }

        let endpoint = format!("{}/v1/{}/{}", self.base_url, Self::family(kind), job_id);
        let response = self
            .client
            .delete(&endpoint)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(Self::transport_error)?;

        Self::check_common(job_id, response).await?;
        tracing::info!("Provider acknowledged cancellation of job {}", job_id);
        Ok(true)
    }
}
