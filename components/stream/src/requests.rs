//! Request bodies for the streaming endpoints.

use serde::{Deserialize, Serialize};

/// A chat message sent to a persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Message text.
    pub content: String,
}

impl ChatRequest {
    /// Creates a chat request.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// A request to rewrite a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRequest {
    /// The story text to rewrite.
    pub content: String,
    /// Free-form guidance for the rewrite.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Named writing style, such as `vivid` or `concise`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl RewriteRequest {
    /// Creates a rewrite request with no instructions or style.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            instructions: None,
            style: None,
        }
    }

    /// Sets the rewrite instructions.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Sets the writing style.
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// A prompt for seeding a new story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRequest {
    /// Seed prompt.
    pub prompt: String,
}

impl SeedRequest {
    /// Creates a seed request.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}
