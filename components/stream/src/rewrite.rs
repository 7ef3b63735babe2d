//! Streaming a story rewrite and reviewing it as a diff.

use mosaic_diff::{DiffEngine, DiffOptions, DiffSegment, DiffStats};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::client::StreamClient;
use crate::consumer::{StreamHandler, StreamOutcome, consume};
use crate::error::StreamError;
use crate::requests::RewriteRequest;

/// Accumulates a streamed rewrite of one original text.
#[derive(Debug, Clone)]
pub struct RewriteSession {
    original: String,
    rewrite: String,
    chunks: usize,
    options: DiffOptions,
}

impl RewriteSession {
    /// Starts a session for `original` with default diff options.
    #[must_use]
    pub fn new(original: impl Into<String>) -> Self {
        Self::with_options(original, DiffOptions::default())
    }

    /// Starts a session that diffs with `options`.
    #[must_use]
    pub fn with_options(original: impl Into<String>, options: DiffOptions) -> Self {
        Self {
            original: original.into(),
            rewrite: String::new(),
            chunks: 0,
            options,
        }
    }

    /// The text being rewritten.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The rewrite received so far.
    #[must_use]
    pub fn rewrite(&self) -> &str {
        &self.rewrite
    }

    /// Number of chunks received so far.
    #[must_use]
    pub const fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Diffs the original against the rewrite received so far.
    ///
    /// A cancelled or failed stream still yields its partial rewrite.
    #[must_use]
    pub fn finish(self) -> RewriteReview {
        let segments = DiffEngine::new(self.options).compute(&self.original, &self.rewrite);
        let stats = DiffStats::from_segments(&segments);
        RewriteReview {
            original: self.original,
            rewrite: self.rewrite,
            segments,
            stats,
        }
    }
}

impl StreamHandler for RewriteSession {
    fn on_chunk(&mut self, content: &str) {
        self.rewrite.push_str(content);
        self.chunks += 1;
    }
}

/// An original text, its rewrite and the diff between them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewriteReview {
    /// The text that was rewritten.
    pub original: String,
    /// The full (or partial) rewrite.
    pub rewrite: String,
    /// Inline diff from original to rewrite.
    pub segments: Vec<DiffSegment>,
    /// Summary of the diff.
    pub stats: DiffStats,
}

/// Streams a rewrite of `request.content` from `path` and diffs the result.
///
/// Cancellation, error events and a stream that breaks after it was opened
/// all end in an outcome, with whatever was received so far in the review.
///
/// # Errors
///
/// Returns an error if the stream cannot be opened.
#[instrument(skip_all, fields(path = %path))]
pub async fn run_rewrite(
    client: &StreamClient,
    path: &str,
    request: &RewriteRequest,
    options: DiffOptions,
    cancel: &CancellationToken,
) -> Result<(StreamOutcome, RewriteReview), StreamError> {
    let mut session = RewriteSession::with_options(request.content.clone(), options);
    let outcome = match client.open(path, request, cancel).await {
        Ok(events) => match consume(events, &mut session, cancel).await {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(error = %error, chunks = session.chunk_count(), "rewrite stream broke");
                StreamOutcome::interrupted(&error)
            }
        },
        Err(StreamError::Cancelled) => StreamOutcome::Cancelled,
        Err(error) => return Err(error),
    };

    let review = session.finish();
    info!(
        inserted = review.stats.inserted_chars,
        deleted = review.stats.deleted_chars,
        completed = outcome.is_completed(),
        "rewrite reviewed"
    );
    Ok((outcome, review))
}
