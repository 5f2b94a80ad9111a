//! Shared HTTP client settings for the REST adapters.

use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;

use crate::error::Result;

/// Timeouts and retry behaviour for one REST collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_http_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Maximum number of attempts for transient failures.
    #[serde(default = "default_http_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Backoff between retries in milliseconds.
    #[serde(default = "default_http_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

const fn default_http_timeout_ms() -> u64 {
    30_000
}

const fn default_http_connect_timeout_ms() -> u64 {
    5_000
}

const fn default_http_retry_max_attempts() -> u32 {
    3
}

const fn default_http_retry_backoff_ms() -> u64 {
    500
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_http_timeout_ms(),
            connect_timeout_ms: default_http_connect_timeout_ms(),
            retry_max_attempts: default_http_retry_max_attempts(),
            retry_backoff_ms: default_http_retry_backoff_ms(),
        }
    }
}

impl HttpConfig {
    /// Build a reqwest client with these timeouts.
    pub fn build_client(&self) -> Result<HttpClient> {
        Ok(HttpClient::builder()
            .timeout(Duration::from_millis(self.timeout_ms))
            .connect_timeout(Duration::from_millis(self.connect_timeout_ms))
            .build()?)
    }

    /// Attempts to make, never less than one.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.retry_max_attempts.max(1)
    }

    #[must_use]
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// Whether a transport error is worth retrying.
pub(crate) fn should_retry(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

/// Rate limiting and server errors are transient; other statuses are final.
pub(crate) fn should_retry_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
