//! Streaming API configuration for the Mosaic host.
//!
//! This module defines the server address, credentials and retry policy
//! used when streaming rewrites.

use std::time::Duration;

use mosaic_stream::{RetryConfig, StreamClientConfig, Url};
use secrecy::SecretString;
use serde::Deserialize;

/// Streaming API settings.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    /// Base URL that endpoint paths are joined onto.
    pub base_url: String,
    /// Bearer token for the API.
    pub token: Option<SecretString>,
    /// Maximum retries when opening a stream.
    pub max_retries: u32,
    /// Base delay for exponential backoff, in milliseconds.
    pub base_delay_ms: u64,
    /// Idle timeout between reads, in milliseconds; 0 disables it.
    pub chunk_timeout_ms: u64,
}

impl ApiSettings {
    /// Builds the stream client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL.
    pub fn client_config(&self) -> anyhow::Result<StreamClientConfig> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| anyhow::anyhow!("Invalid API base URL '{}': {e}", self.base_url))?;

        let retry = RetryConfig::new()
            .with_max_retries(self.max_retries)
            .with_base_delay(Duration::from_millis(self.base_delay_ms));
        let chunk_timeout =
            (self.chunk_timeout_ms > 0).then(|| Duration::from_millis(self.chunk_timeout_ms));

        let mut config = StreamClientConfig::new(base_url)
            .with_retry(retry)
            .with_chunk_timeout(chunk_timeout);
        if let Some(token) = &self.token {
            config = config.with_token(token.clone());
        }
        Ok(config)
    }
}
