//! HTTP access and the fixed-delay retry loop
//!
//! [`HttpFetcher`] wraps one pooled `reqwest::Client` shared by every source.
//! [`RetryingFetcher`] replays a source's whole call sequence until it
//! succeeds, the attempt budget runs out, or the poll is cancelled.

use serde_json::Value;
use status_config::RetryConfig;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{AdapterError, FetchError, Result};
use crate::xml::Element;

/// Longest response body kept in a [`FetchError::Status`]
const MAX_ERROR_BODY: usize = 512;

/// Default cap on any response body read into memory
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Shared HTTP client for unauthenticated GET requests
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    max_body: usize,
}

impl HttpFetcher {
    /// Build a client with a per-request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::Configuration(format!("HTTP client: {}", e)))?;
        Ok(Self::from_client(client))
    }

    /// Reuse an existing client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self {
            client,
            max_body: MAX_BODY_BYTES,
        }
    }

    /// Override the response body cap
    pub fn with_max_body(mut self, bytes: usize) -> Self {
        self.max_body = bytes;
        self
    }

    /// GET `url` and return the body of a 2xx response
    pub async fn get_text(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<String, FetchError> {
        debug!("GET {}", url);

        let request = async {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            let body = self.read_body(url, response).await?;

            if !status.is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                    body: body.chars().take(MAX_ERROR_BODY).collect(),
                });
            }

            Ok(body)
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = request => result,
        }
    }

    /// Read the body in chunks, giving up once it passes the cap
    async fn read_body(
        &self,
        url: &str,
        mut response: reqwest::Response,
    ) -> std::result::Result<String, FetchError> {
        let too_large = || FetchError::BodyTooLarge {
            url: url.to_string(),
            limit: self.max_body,
        };

        if response
            .content_length()
            .is_some_and(|len| len > self.max_body as u64)
        {
            return Err(too_large());
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > self.max_body {
                return Err(too_large());
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// GET `url` and parse the body as JSON
    pub async fn get_json(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<Value, FetchError> {
        let body = self.get_text(url, cancel).await?;
        serde_json::from_str(&body).map_err(|e| FetchError::MalformedBody {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// GET `url` and parse the body as an XML element tree
    pub async fn get_xml(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<Element, FetchError> {
        let body = self.get_text(url, cancel).await?;
        Element::parse(&body).map_err(|e| FetchError::MalformedBody {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Fixed-delay retry of a complete upstream call sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryingFetcher {
    attempts: u32,
    delay: Duration,
}

impl RetryingFetcher {
    pub fn new(retry: &RetryConfig) -> Self {
        Self {
            attempts: retry.attempts(),
            delay: retry.delay(),
        }
    }

    /// Total attempts including the first
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Run `op` until it succeeds
    ///
    /// Each attempt calls `op` afresh, so a failure in any call of the
    /// sequence restarts it from the first call. Cancellation is checked
    /// before every attempt and raced against the delay.
    pub async fn run<T, F, Fut>(
        &self,
        source_id: &str,
        cancel: &CancellationToken,
        mut op: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, FetchError>>,
    {
        let cancelled = || AdapterError::Cancelled {
            source_id: source_id.to_string(),
        };

        let mut attempt = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(cancelled());
            }
            attempt += 1;

            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!("{} recovered on attempt {}/{}", source_id, attempt, self.attempts);
                    }
                    return Ok(value);
                }
                Err(FetchError::Cancelled) => return Err(cancelled()),
                Err(e) if attempt >= self.attempts => {
                    return Err(AdapterError::RetriesExhausted {
                        source_id: source_id.to_string(),
                        attempts: attempt,
                        last: e,
                    });
                }
                Err(e) => {
                    warn!(
                        "Fetch failed for {} (attempt {}/{}): {}; retrying in {:?}",
                        source_id, attempt, self.attempts, e, self.delay
                    );

                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(cancelled()),
                        _ = tokio::time::sleep(self.delay) => {}
                    }
                }
            }
        }
    }
}
