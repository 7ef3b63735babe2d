//! HTTP client for streaming endpoints.

use std::pin::Pin;
use std::time::Duration;

use futures_util::Stream;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::decoder::decode_stream;
use crate::error::StreamError;
use crate::event::StreamEvent;
use crate::retry::RetryConfig;

/// Default idle timeout between reads (in milliseconds)
pub const DEFAULT_CHUNK_TIMEOUT_MS: u64 = 30000;

/// A decoded event stream ready for [`consume`](crate::consume).
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, StreamError>> + Send>>;

/// Configuration for a [`StreamClient`]
#[derive(Debug, Clone)]
pub struct StreamClientConfig {
    /// Base URL that endpoint paths are joined onto
    pub base_url: Url,
    /// Bearer token sent with every request
    pub token: Option<SecretString>,
    /// Retry policy for opening a stream
    pub retry: RetryConfig,
    /// Longest wait for the response or for the next read, if any
    pub chunk_timeout: Option<Duration>,
}

impl StreamClientConfig {
    /// Creates a config with default retry and timeout settings
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            retry: RetryConfig::new(),
            chunk_timeout: Some(Duration::from_millis(DEFAULT_CHUNK_TIMEOUT_MS)),
        }
    }

    /// Sets the bearer token
    #[must_use]
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets the retry policy
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the idle timeout; `None` waits forever
    #[must_use]
    pub const fn with_chunk_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.chunk_timeout = timeout;
        self
    }
}

/// Opens event streams against one server.
#[derive(Debug, Clone)]
pub struct StreamClient {
    http: Client,
    config: StreamClientConfig,
}

impl StreamClient {
    /// Creates a client with its own connection pool.
    #[must_use]
    pub fn new(config: StreamClientConfig) -> Self {
        Self::with_http_client(config, Client::new())
    }

    /// Creates a client that shares an existing connection pool.
    #[must_use]
    pub const fn with_http_client(config: StreamClientConfig, http: Client) -> Self {
        Self { http, config }
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &StreamClientConfig {
        &self.config
    }

    /// POSTs `body` to `path` and returns the decoded response stream.
    ///
    /// Connection failures, timeouts, 429 and 5xx responses are retried
    /// with backoff. Errors after the stream has been returned end the
    /// stream instead. `cancel` interrupts both the request and the backoff
    /// sleep.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidUrl`] if `path` cannot be joined onto
    /// the base URL, [`StreamError::Cancelled`] once `cancel` fires, or the
    /// last error once retries are exhausted or a permanent error occurs.
    #[instrument(skip(self, body, cancel), fields(base_url = %self.config.base_url))]
    pub async fn open<B>(
        &self,
        path: &str,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<EventStream, StreamError>
    where
        B: Serialize + ?Sized,
    {
        let url = self
            .config
            .base_url
            .join(path)
            .map_err(|e| StreamError::InvalidUrl(format!("Invalid URL join: {e}")))?;

        let retry = self.config.retry;
        let mut attempt = 0;
        loop {
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(cancelled(attempt)),
                result = self.connect(&url, body) => result,
            };
            match result {
                Ok(response) => {
                    debug!(attempt, status = %response.status(), "stream opened");
                    let events = decode_stream(response.bytes_stream(), self.config.chunk_timeout);
                    return Ok(Box::pin(events));
                }
                Err(error) => {
                    if !retry.should_retry(attempt, &error) {
                        debug!(attempts = attempt + 1, error = %error, "giving up on stream");
                        return Err(error);
                    }

                    let delay = retry.backoff(attempt);
                    let delay_ms: u64 = delay.as_millis().try_into().unwrap_or(u64::MAX);
                    warn!(
                        attempt = attempt + 1,
                        max_retries = retry.max_retries,
                        delay_ms = delay_ms,
                        error = %error,
                        "Stream request failed, retrying after backoff"
                    );
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => return Err(cancelled(attempt + 1)),
                        () = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
            }
        }
    }

    async fn connect<B>(&self, url: &Url, body: &B) -> Result<reqwest::Response, StreamError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self
            .http
            .post(url.clone())
            .header(ACCEPT, "text/event-stream")
            .json(body);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let send = request.send();
        let response = match self.config.chunk_timeout {
            Some(limit) => tokio::time::timeout(limit, send)
                .await
                .map_err(|_| StreamError::Timeout(limit))?,
            None => send.await,
        }
        .map_err(|e| StreamError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StreamError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

fn cancelled(attempts: u32) -> StreamError {
    debug!(attempts, "cancelled while opening stream");
    StreamError::Cancelled
}
