//! Decoded stream events.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Extra fields carried by a `done` event (message or story ids, usage).
pub type DoneFields = Map<String, Value>;

/// One `data:` payload of an event stream.
///
/// The wire form is a JSON object with a `type` discriminator:
/// `{"type":"chunk","content":"..."}`, `{"type":"done", ...}` or
/// `{"type":"error","message":"...","retryable":false}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// A fragment of generated text.
    Chunk {
        /// Text to append.
        content: String,
    },
    /// Generation finished.
    Done {
        /// Every other field of the event.
        #[serde(flatten)]
        fields: DoneFields,
    },
    /// Generation failed on the server.
    Error {
        /// Human-readable reason.
        message: String,
        /// Whether the server considers a retry worthwhile.
        #[serde(default)]
        retryable: bool,
    },
}

impl StreamEvent {
    /// Creates a chunk event.
    #[must_use]
    pub fn chunk(content: impl Into<String>) -> Self {
        Self::Chunk {
            content: content.into(),
        }
    }

    /// Creates a done event without extra fields.
    #[must_use]
    pub fn done() -> Self {
        Self::Done {
            fields: DoneFields::new(),
        }
    }

    /// Returns true for `done` and `error` events.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Chunk { .. })
    }
}
