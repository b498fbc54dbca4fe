//! HTTP transport.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use valet_types::BoxError;

use crate::url::BASE_URL;

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Bytes,
}

impl FetchResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Issues a GET and returns the status and body.
///
/// Implementations own timeouts and retries. Errors are opaque to callers and
/// are passed through unchanged.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetches `url`.
    async fn fetch(&self, url: &str) -> Result<FetchResponse, BoxError>;
}

#[async_trait]
impl<T: Fetch + ?Sized> Fetch for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, BoxError> {
        (**self).fetch(url).await
    }
}

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, without trailing slash.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Maximum retry attempts for 5xx, 429 and connection failures.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            max_retries: 2,
            base_delay_ms: 250,
            max_delay_ms: 5_000,
            user_agent: format!("valet/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Sets the API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Errors raised by [`HttpClient`].
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request kept failing until retries ran out.
    #[error("Request failed after {attempts} attempts: {source}")]
    Exhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The last failure.
        #[source]
        source: reqwest::Error,
    },
}

/// `reqwest`-backed [`Fetch`] implementation with bounded retries.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
}

impl HttpClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, TransportError> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends a GET request, retrying server errors and rate limiting.
    ///
    /// Non-success responses are returned, not turned into errors, once
    /// retries are exhausted so callers can read the API's error body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be completed.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "valet::http::get", skip(self), err)
    )]
    pub async fn get(&self, url: &str) -> Result<FetchResponse, TransportError> {
        let mut attempts = 0;

        loop {
            #[cfg(feature = "tracing")]
            tracing::info!(attempt = attempts + 1, "Request: GET {url}");

            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if (status.is_server_error()
                        || status == reqwest::StatusCode::TOO_MANY_REQUESTS)
                        && attempts < self.config.max_retries
                    {
                        attempts += 1;
                        #[cfg(feature = "tracing")]
                        tracing::debug!(%status, attempts, "retrying");
                        tokio::time::sleep(self.calculate_backoff_delay(attempts)).await;
                        continue;
                    }

                    #[cfg(feature = "tracing")]
                    log_response(&response);

                    let body = response.bytes().await?;
                    return Ok(FetchResponse::new(status.as_u16(), body));
                }
                Err(e) if self.is_retryable_error(&e) && attempts < self.config.max_retries => {
                    attempts += 1;
                    tokio::time::sleep(self.calculate_backoff_delay(attempts)).await;
                }
                Err(e) if attempts > 0 => {
                    return Err(TransportError::Exhausted {
                        attempts: attempts + 1,
                        source: e,
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Calculates the backoff delay with exponential backoff and jitter.
    fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        let exp_delay = self
            .config
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(10));
        let capped_delay = exp_delay.min(self.config.max_delay_ms);

        // Deterministic jitter (±25%) derived from the attempt number.
        let jitter_range = capped_delay / 4;
        let jitter = if jitter_range > 0 {
            let jitter_offset = (u64::from(attempt) * 17) % (jitter_range * 2);
            jitter_offset as i64 - jitter_range as i64
        } else {
            0
        };

        let final_delay = (capped_delay as i64 + jitter).max(100) as u64;
        Duration::from_millis(final_delay)
    }

    /// Determines if an error is retryable.
    fn is_retryable_error(&self, error: &reqwest::Error) -> bool {
        if error.is_builder() {
            return false;
        }
        error.is_timeout() || error.is_connect()
    }
}

#[async_trait]
impl Fetch for HttpClient {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, BoxError> {
        self.get(url).await.map_err(Into::into)
    }
}

#[cfg(feature = "tracing")]
fn log_response(response: &reqwest::Response) {
    let status = response.status();
    if status == reqwest::StatusCode::OK {
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        let disposition = header("Content-Disposition");
        let filename = disposition
            .strip_prefix("attachment; filename=")
            .unwrap_or(&disposition);
        tracing::info!(
            "Response: {status}, Filename: {filename}, Generated: {} UTC",
            header("X-Generated")
        );
    } else {
        tracing::info!("Response: {status}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.base_delay_ms, 250);
        assert!(config.user_agent.starts_with("valet/"));
    }

    #[test]
    fn test_client_config_builders() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9000")
            .with_timeout(Duration::from_secs(1))
            .with_max_retries(0);
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.max_retries, 0);
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::with_defaults();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_backoff_delay_calculation() {
        let client = HttpClient::with_defaults().unwrap();

        // base_delay * 2 = 500ms (plus jitter)
        let delay1 = client.calculate_backoff_delay(1);
        assert!(delay1.as_millis() >= 375 && delay1.as_millis() <= 625);

        // base_delay * 4 = 1000ms (plus jitter)
        let delay2 = client.calculate_backoff_delay(2);
        assert!(delay2.as_millis() >= 750 && delay2.as_millis() <= 1250);

        let delay_high = client.calculate_backoff_delay(20);
        assert!(delay_high.as_millis() <= 6250);
    }

    #[test]
    fn test_fetch_response_success_range() {
        assert!(FetchResponse::new(200, "{}").is_success());
        assert!(FetchResponse::new(204, Bytes::new()).is_success());
        assert!(!FetchResponse::new(404, "{}").is_success());
        assert!(!FetchResponse::new(503, "").is_success());
    }
}
