//! Error types for event stream operations.

use std::time::Duration;

/// Errors that can occur while opening or reading an event stream.
///
/// Error events sent by the server are not errors at this level; they end
/// the stream with [`StreamOutcome::Failed`](crate::StreamOutcome::Failed).
#[derive(Debug, Clone, thiserror::Error)]
pub enum StreamError {
    /// Transport failure while connecting or reading
    #[error("Network Error: {0}")]
    Network(String),
    /// The server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
    /// The endpoint could not be joined onto the base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// No data arrived within the idle timeout
    #[error("Timed out after {0:?} waiting for stream data")]
    Timeout(Duration),
    /// The cancellation token fired before the stream was opened
    #[error("Cancelled before the stream was opened")]
    Cancelled,
}

impl StreamError {
    /// Returns `true` if this error is transient and a new attempt may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => *status == 429 || (500..600).contains(status),
            Self::InvalidUrl(_) | Self::Cancelled => false,
        }
    }

    /// Returns `true` if this error is permanent and should not be retried.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        !self.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> StreamError {
        StreamError::Status {
            status,
            body: String::new(),
        }
    }

    #[test]
    fn test_error_is_retryable() {
        assert!(StreamError::Network("reset".to_string()).is_retryable());
        assert!(StreamError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(status(429).is_retryable());
        assert!(status(503).is_retryable());

        assert!(!status(400).is_retryable());
        assert!(!status(401).is_retryable());
        assert!(!StreamError::InvalidUrl("bad".to_string()).is_retryable());
        assert!(!StreamError::Cancelled.is_retryable());
    }

    #[test]
    fn test_error_is_permanent() {
        assert!(status(404).is_permanent());
        assert!(!status(502).is_permanent());
    }

    #[test]
    fn test_error_display() {
        let err = StreamError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
        assert_eq!(
            StreamError::Network("refused".to_string()).to_string(),
            "Network Error: refused"
        );
    }
}
