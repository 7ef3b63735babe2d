//! Driving a handler from an event stream.

use std::pin::pin;

use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::StreamError;
use crate::event::{DoneFields, StreamEvent};

/// Receives the events of one stream.
pub trait StreamHandler {
    /// Called for each text fragment, in arrival order.
    fn on_chunk(&mut self, content: &str);

    /// Called once when the server reports completion.
    fn on_done(&mut self, _fields: &DoneFields) {}

    /// Called once when the server reports a failure.
    fn on_error(&mut self, _message: &str, _retryable: bool) {}
}

/// How a consumed stream ended.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamOutcome {
    /// A `done` event arrived.
    Completed {
        /// Extra fields of the `done` event.
        fields: DoneFields,
    },
    /// An `error` event arrived, or the stream broke after it was opened.
    Failed {
        /// Server-provided reason.
        message: String,
        /// Whether the server considers a retry worthwhile.
        retryable: bool,
    },
    /// The cancellation token fired.
    Cancelled,
    /// The body ended without a terminal event.
    Ended,
}

impl StreamOutcome {
    /// Returns true if the server reported completion.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// The outcome of a stream cut short by `error`.
    ///
    /// Cancellation maps to [`Cancelled`](Self::Cancelled); every other error
    /// maps to [`Failed`](Self::Failed) with the error's retryability.
    #[must_use]
    pub fn interrupted(error: &StreamError) -> Self {
        match error {
            StreamError::Cancelled => Self::Cancelled,
            other => Self::Failed {
                message: other.to_string(),
                retryable: other.is_retryable(),
            },
        }
    }
}

/// Feeds `events` to `handler` until a terminal event, the end of the
/// stream or cancellation.
///
/// Once `cancel` fires no further callbacks are made, including for events
/// already decoded from the same network read. Events after a terminal
/// event are never delivered.
///
/// # Errors
///
/// Returns the first transport error yielded by `events`.
pub async fn consume<S, H>(
    events: S,
    handler: &mut H,
    cancel: &CancellationToken,
) -> Result<StreamOutcome, StreamError>
where
    S: Stream<Item = Result<StreamEvent, StreamError>>,
    H: StreamHandler + ?Sized,
{
    let mut events = pin!(events);
    let mut chunks = 0usize;

    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            next = events.next() => Some(next),
        };
        let Some(next) = next else {
            debug!(chunks, "stream cancelled");
            return Ok(StreamOutcome::Cancelled);
        };
        if cancel.is_cancelled() {
            debug!(chunks, "stream cancelled");
            return Ok(StreamOutcome::Cancelled);
        }

        match next {
            Some(Ok(StreamEvent::Chunk { content })) => {
                chunks += 1;
                handler.on_chunk(&content);
            }
            Some(Ok(StreamEvent::Done { fields })) => {
                debug!(chunks, "stream completed");
                handler.on_done(&fields);
                return Ok(StreamOutcome::Completed { fields });
            }
            Some(Ok(StreamEvent::Error { message, retryable })) => {
                debug!(chunks, %message, retryable, "stream failed");
                handler.on_error(&message, retryable);
                return Ok(StreamOutcome::Failed { message, retryable });
            }
            Some(Err(e)) => return Err(e),
            None => {
                debug!(chunks, "stream ended without a terminal event");
                return Ok(StreamOutcome::Ended);
            }
        }
    }
}
