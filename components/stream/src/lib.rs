//! Mosaic Stream - client side of streamed chat, rewrite and seed responses.
//!
//! The server answers a POST with a `text/event-stream` body whose `data:`
//! lines carry JSON events (`chunk`, `done`, `error`). This crate opens such
//! streams with retry and backoff ([`StreamClient`]), decodes them
//! incrementally ([`SseDecoder`], [`decode_stream`]) and feeds them to a
//! [`StreamHandler`] with cancellation ([`consume`]).
//!
//! [`RewriteSession`] collects a streamed story rewrite and turns it into a
//! reviewable inline diff.

/// HTTP client.
pub mod client;
/// Event consumption.
pub mod consumer;
/// Incremental event-stream decoding.
pub mod decoder;
/// Error types.
pub mod error;
/// Stream events.
pub mod event;
/// Request bodies.
pub mod requests;
/// Retry policy.
pub mod retry;
/// Rewrite review.
pub mod rewrite;

pub use client::{EventStream, StreamClient, StreamClientConfig};
pub use consumer::{StreamHandler, StreamOutcome, consume};
pub use decoder::{SseDecoder, decode_stream};
pub use error::StreamError;
pub use event::{DoneFields, StreamEvent};
pub use requests::{ChatRequest, RewriteRequest, SeedRequest};
pub use retry::RetryConfig;
pub use rewrite::{RewriteReview, RewriteSession, run_rewrite};
pub use reqwest::Url;
pub use tokio_util::sync::CancellationToken;
