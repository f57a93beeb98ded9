//! Command response envelope.
//!
//! Every command produces a `Response`: plain text or rich-content blocks, a
//! success flag, and a visibility flag. The transport adapter consumes the
//! payload form; node logic only ever goes through the factory constructors.

use serde_json::{json, Value};

/// Response body: plain text or opaque rich-content blocks.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseContent {
    Text(String),
    Blocks(Vec<Value>),
}

/// Result of executing a command. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub content: ResponseContent,
    pub success: bool,
    /// When set, the response is shown only to the invoking user.
    pub ephemeral: bool,
}

impl Response {
    /// Plain text response, successful and invoker-only by default.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: ResponseContent::Text(content.into()),
            success: true,
            ephemeral: true,
        }
    }

    /// Failed response carrying the given text verbatim.
    pub fn failure(content: impl Into<String>) -> Self {
        Self {
            content: ResponseContent::Text(content.into()),
            success: false,
            ephemeral: true,
        }
    }

    /// Standardized error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self::failure(format!(":x: Error: {}", message.into()))
    }

    /// Standardized success response.
    pub fn success(message: impl Into<String>) -> Self {
        Self::text(format!(":white_check_mark: {}", message.into()))
    }

    /// Response carrying rich-content blocks.
    pub fn with_blocks(blocks: Vec<Value>) -> Self {
        Self {
            content: ResponseContent::Blocks(blocks),
            success: true,
            ephemeral: true,
        }
    }

    /// Make the response visible to the whole channel.
    pub fn in_channel(mut self) -> Self {
        self.ephemeral = false;
        self
    }

    /// Plain text of the response, when it has any.
    pub fn text_content(&self) -> Option<&str> {
        match &self.content {
            ResponseContent::Text(text) => Some(text),
            ResponseContent::Blocks(_) => None,
        }
    }

    /// Wire payload consumed by the transport adapter.
    pub fn as_payload(&self) -> Value {
        let response_type = if self.ephemeral {
            "ephemeral"
        } else {
            "in_channel"
        };
        match &self.content {
            ResponseContent::Text(text) => json!({
                "text": text,
                "response_type": response_type,
            }),
            ResponseContent::Blocks(blocks) => json!({
                "blocks": blocks,
                "response_type": response_type,
            }),
        }
    }
}
