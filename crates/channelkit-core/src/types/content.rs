//! Message content types.

use serde::{Deserialize, Serialize};

/// Content format a channel can carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageContentType {
    /// Plain UTF-8 text.
    #[default]
    PlainText,

    /// HTML markup.
    Html,

    /// Markdown markup.
    Markdown,

    /// Structured JSON payload.
    Json,

    /// Opaque binary payload (base64 in transit).
    Binary,

    /// Provider-side template reference.
    Template,
}

/// The content of an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    /// Format of the body.
    pub content_type: MessageContentType,

    /// The message body.
    pub body: String,

    /// Optional subject line (email-style channels).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl MessageContent {
    /// Create content with the given type and body.
    pub fn new(content_type: MessageContentType, body: impl Into<String>) -> Self {
        Self {
            content_type,
            body: body.into(),
            subject: None,
        }
    }

    /// Create plain-text content.
    pub fn text(body: impl Into<String>) -> Self {
        Self::new(MessageContentType::PlainText, body)
    }

    /// Attach a subject line.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}
