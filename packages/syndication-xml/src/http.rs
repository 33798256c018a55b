//! HTTP fetch for loading documents from URLs.
//!
//! Each fetch is described by a caller-owned [`FetchRequest`]. Cancellation
//! goes through the request's [`CancellationHandle`]; there is no
//! process-wide request state.

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::config::{
    validate_fetch_url, DEFAULT_MAX_RESPONSE_SIZE, HTTP_TIMEOUT_SECS, MAX_RETRIES,
    RETRY_BASE_DELAY_MS, USER_AGENT,
};
use crate::error::{Result, SyndicationError};
use crate::options::LoadOptions;

/// Shared flag used to cancel an in-flight fetch from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancellationHandle {
    /// Create a new, not cancelled handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A single document fetch.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    url: Url,
    timeout: Duration,
    max_response_size: u64,
    max_retries: u32,
    cancellation: CancellationHandle,
}

impl FetchRequest {
    /// Create a request with default timeout and size limit.
    ///
    /// # Errors
    /// Returns `InvalidUrl` unless `url` is an absolute HTTP(S) URL.
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            url: validate_fetch_url(url)?,
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
            max_retries: MAX_RETRIES,
            cancellation: CancellationHandle::new(),
        })
    }

    /// Create a request using the timeout and size limit of `options`.
    pub fn from_options(url: &str, options: &LoadOptions) -> Result<Self> {
        Ok(Self::new(url)?
            .with_timeout(options.timeout)
            .with_max_response_size(options.max_response_size))
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_response_size(mut self, bytes: u64) -> Self {
        self.max_response_size = bytes;
        self
    }

    /// Set the number of attempts for transient failures (at least one).
    #[must_use]
    pub fn with_max_retries(mut self, attempts: u32) -> Self {
        self.max_retries = attempts.max(1);
        self
    }

    /// Use a caller-provided cancellation handle.
    #[must_use]
    pub fn with_cancellation(mut self, handle: CancellationHandle) -> Self {
        self.cancellation = handle;
        self
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn max_response_size(&self) -> u64 {
        self.max_response_size
    }

    /// Handle that cancels this request.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationHandle {
        &self.cancellation
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancellation.is_cancelled() {
            return Err(SyndicationError::Cancelled {
                url: self.url.to_string(),
            });
        }
        Ok(())
    }
}

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` configured with the timeout and user agent.
pub fn create_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Download the body of a request with retry logic.
///
/// Uses exponential backoff for transient failures (network errors, 5xx
/// responses). Client errors (4xx) fail immediately.
///
/// # Returns
/// Raw bytes of the response body
pub fn fetch(request: &FetchRequest) -> Result<Vec<u8>> {
    let client = create_client(request.timeout)?;
    let url = request.url.as_str();
    let mut last_error: Option<String> = None;

    for attempt in 0..request.max_retries {
        if attempt > 0 {
            // Exponential backoff: 500ms, 1000ms, 2000ms
            let delay = RETRY_BASE_DELAY_MS * (1 << (attempt - 1));
            tracing::debug!(attempt, delay_ms = delay, "Retrying after delay");
            thread::sleep(Duration::from_millis(delay));
        }
        request.check_cancelled()?;

        match client.get(url).send() {
            Ok(response) => {
                let status = response.status();

                if status.is_server_error() {
                    tracing::warn!(
                        status = %status,
                        attempt = attempt + 1,
                        max_retries = request.max_retries,
                        "Server error, will retry"
                    );
                    last_error = Some(format!("Server error: {status}"));
                    continue;
                }

                let response = response
                    .error_for_status()
                    .map_err(|source| SyndicationError::Fetch {
                        url: url.to_string(),
                        source,
                    })?;
                let body = read_limited(response, request.max_response_size)?;
                request.check_cancelled()?;
                tracing::debug!(url, bytes = body.len(), "Fetched document");
                return Ok(body);
            }
            Err(e) => {
                if e.is_connect() || e.is_timeout() {
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_retries = request.max_retries,
                        "Connection error, will retry"
                    );
                    last_error = Some(e.to_string());
                    continue;
                }
                return Err(SyndicationError::Fetch {
                    url: url.to_string(),
                    source: e,
                });
            }
        }
    }

    Err(SyndicationError::RetriesExhausted {
        attempts: request.max_retries,
        message: last_error.unwrap_or_else(|| "Unknown error".to_string()),
    })
}

fn read_limited(response: reqwest::blocking::Response, limit: u64) -> Result<Vec<u8>> {
    if let Some(size) = response.content_length() {
        if size > limit {
            return Err(SyndicationError::ResponseTooLarge { size, limit });
        }
    }

    let mut body = Vec::new();
    response.take(limit.saturating_add(1)).read_to_end(&mut body)?;
    let size = body.len() as u64;
    if size > limit {
        return Err(SyndicationError::ResponseTooLarge { size, limit });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client() {
        assert!(create_client(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_request_rejects_non_http_urls() {
        assert!(matches!(
            FetchRequest::new("ftp://example.com/a.opml"),
            Err(SyndicationError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_cancellation_is_shared() {
        let handle = CancellationHandle::new();
        let request = FetchRequest::new("http://example.com/rsd.xml")
            .unwrap()
            .with_cancellation(handle.clone());
        assert!(!request.cancellation().is_cancelled());

        handle.cancel();
        assert!(request.cancellation().is_cancelled());
        assert!(matches!(fetch(&request), Err(SyndicationError::Cancelled { .. })));
    }

    #[test]
    fn test_request_from_options() {
        let options = LoadOptions::default()
            .with_timeout(Duration::from_secs(3))
            .with_max_response_size(1024);
        let request = FetchRequest::from_options("https://example.com/", &options).unwrap();
        assert_eq!(request.timeout(), Duration::from_secs(3));
        assert_eq!(request.max_response_size(), 1024);
        assert_eq!(request.with_max_retries(0).max_retries, 1);
    }
}
