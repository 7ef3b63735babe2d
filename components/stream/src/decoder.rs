//! Incremental decoding of `text/event-stream` bodies.
//!
//! Network reads split the body at arbitrary byte positions. The decoder
//! buffers raw bytes, handles each complete line and holds back the trailing
//! partial line until the next read, so a multi-byte character split across
//! two reads is never mangled.

use std::collections::VecDeque;
use std::fmt::Display;
use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, StreamExt, stream};
use tracing::{trace, warn};

use crate::error::StreamError;
use crate::event::StreamEvent;

/// Default limit on a line held back waiting for its newline (1 MiB).
pub const DEFAULT_MAX_LINE_LEN: usize = 1024 * 1024;

/// Buffers stream bytes and yields complete events.
#[derive(Debug)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    // buffer[..scanned] holds no newline
    scanned: usize,
    max_line_len: usize,
    // dropping the rest of an over-long line
    discarding: bool,
    malformed: usize,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::with_max_line_len(DEFAULT_MAX_LINE_LEN)
    }
}

impl SseDecoder {
    /// Creates an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty decoder that drops lines once more than
    /// `max_line_len` bytes of them are waiting for a newline.
    #[must_use]
    pub const fn with_max_line_len(max_line_len: usize) -> Self {
        Self {
            buffer: Vec::new(),
            scanned: 0,
            max_line_len,
            discarding: false,
            malformed: 0,
        }
    }

    /// Feeds one network read and returns the events it completed.
    ///
    /// Each byte is scanned for a newline once, however the body is split.
    /// A partial line that outgrows the line limit is dropped up to its
    /// newline and counted as malformed.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        let mut bytes = bytes;
        if self.discarding {
            let Some(at) = bytes.iter().position(|&b| b == b'\n') else {
                return events;
            };
            self.discarding = false;
            bytes = &bytes[at + 1..];
        }
        self.buffer.extend_from_slice(bytes);

        let (mut start, mut from) = (0, self.scanned);
        while let Some(offset) = self.buffer[from..].iter().position(|&b| b == b'\n') {
            let end = from + offset;
            let line = parse_line(&self.buffer[start..end]);
            self.accept(line, &mut events);
            start = end + 1;
            from = start;
        }
        self.buffer.drain(..start);
        self.scanned = self.buffer.len();

        if self.buffer.len() > self.max_line_len {
            self.malformed += 1;
            warn!(
                len = self.buffer.len(),
                limit = self.max_line_len,
                "dropping over-long stream line"
            );
            self.buffer.clear();
            self.scanned = 0;
            self.discarding = true;
        }

        events
    }

    /// Flushes a final line that was not newline-terminated.
    pub fn finish(&mut self) -> Option<StreamEvent> {
        self.discarding = false;
        self.scanned = 0;
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        let mut events = Vec::with_capacity(1);
        self.accept(parse_line(&rest), &mut events);
        events.pop()
    }

    /// Number of `data:` lines skipped because they did not decode.
    #[must_use]
    pub const fn malformed_count(&self) -> usize {
        self.malformed
    }

    /// Bytes held back waiting for a newline.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    fn accept(&mut self, line: Line, events: &mut Vec<StreamEvent>) {
        match line {
            Line::Event(event) => events.push(event),
            Line::Ignored => {}
            Line::Malformed(reason) => {
                self.malformed += 1;
                warn!(%reason, "skipping malformed stream event");
            }
        }
    }
}

enum Line {
    Event(StreamEvent),
    Ignored,
    Malformed(String),
}

fn parse_line(raw: &[u8]) -> Line {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let Some(payload) = raw.strip_prefix(b"data:") else {
        // Blank separators, comments and event/id/retry fields carry nothing
        // the event payload does not already have.
        return Line::Ignored;
    };
    let payload = payload.strip_prefix(b" ").unwrap_or(payload);

    if payload == b"[DONE]" {
        return Line::Event(StreamEvent::done());
    }
    match serde_json::from_slice(payload) {
        Ok(event) => Line::Event(event),
        Err(e) => Line::Malformed(e.to_string()),
    }
}

struct DecodeState<S> {
    inner: std::pin::Pin<Box<S>>,
    decoder: SseDecoder,
    pending: VecDeque<StreamEvent>,
    idle_timeout: Option<Duration>,
    exhausted: bool,
}

/// Adapts a byte stream into a stream of events.
///
/// Transport errors are yielded once as [`StreamError::Network`] and end the
/// stream. With an `idle_timeout`, a read that takes longer yields
/// [`StreamError::Timeout`] and ends the stream.
pub fn decode_stream<S, E>(
    bytes: S,
    idle_timeout: Option<Duration>,
) -> impl Stream<Item = Result<StreamEvent, StreamError>>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Display,
{
    let state = DecodeState {
        inner: Box::pin(bytes),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        idle_timeout,
        exhausted: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.pending.pop_front() {
                return Some((Ok(event), state));
            }
            if state.exhausted {
                return None;
            }

            let next = match state.idle_timeout {
                Some(limit) => match tokio::time::timeout(limit, state.inner.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        state.exhausted = true;
                        return Some((Err(StreamError::Timeout(limit)), state));
                    }
                },
                None => state.inner.next().await,
            };

            match next {
                Some(Ok(bytes)) => {
                    trace!(len = bytes.len(), "stream read");
                    state.pending.extend(state.decoder.push(&bytes));
                }
                Some(Err(e)) => {
                    state.exhausted = true;
                    return Some((Err(StreamError::Network(e.to_string())), state));
                }
                None => {
                    state.exhausted = true;
                    state.pending.extend(state.decoder.finish());
                }
            }
        }
    })
}
