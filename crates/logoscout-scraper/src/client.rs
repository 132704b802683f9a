//! HTTP plumbing for storefront page fetches and candidate downloads.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::retry::retry_with_backoff;

/// HTTP client carrying the fixed identifying User-Agent and the shared
/// request timeout.
///
/// Page fetches are retried with exponential backoff on transient errors;
/// candidate downloads are tried exactly once, since a failed download just
/// moves the selector on to the next candidate.
pub struct PageClient {
    client: Client,
    /// Maximum number of retry attempts after the first failed page fetch.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `base * 2^attempt`.
    backoff_base_secs: u64,
}

impl PageClient {
    /// Creates a `PageClient` with configured timeout, `User-Agent`, and
    /// retry policy. Set `max_retries` to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches a storefront page as text, with automatic retry on
    /// transient errors. Character decoding is best-effort via reqwest.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`ScraperError::NotFound`] — HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`] — any other non-2xx status
    ///   (5xx retried, 4xx not).
    /// - [`ScraperError::Http`] — network or TLS failure after all retries.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        let url = url.to_owned();
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header(
                        reqwest::header::ACCEPT,
                        "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
                    )
                    .send()
                    .await?;

                Self::check_status(&url, &response)?;
                Ok(response.text().await?)
            }
        })
        .await
    }

    /// Downloads one candidate asset, returning its normalized content type
    /// (the portion before any `;`, trimmed and lowercased — empty when the
    /// server sent none) and the raw response bytes. Never retried.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] on network failure or any non-2xx status;
    /// the selector treats every variant as "skip this candidate".
    pub async fn download_asset(&self, url: &str) -> Result<(String, Vec<u8>), ScraperError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "image/*,*/*;q=0.8")
            .send()
            .await?;

        Self::check_status(url, &response)?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(normalize_content_type)
            .unwrap_or_default();

        let body = response.bytes().await?;
        Ok((content_type, body.to_vec()))
    }

    /// Maps non-success statuses to typed errors; 2xx passes through.
    fn check_status(url: &str, response: &reqwest::Response) -> Result<(), ScraperError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);

            return Err(ScraperError::RateLimited {
                domain: extract_domain(url),
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(())
    }
}

/// Normalizes a raw `Content-Type` header value: everything before the
/// first `;`, trimmed, lowercased.
fn normalize_content_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Extracts the hostname from a URL for use in error messages.
/// Falls back to the full URL string if parsing fails.
fn extract_domain(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}
