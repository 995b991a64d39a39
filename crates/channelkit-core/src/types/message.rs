//! Abstract message and batch interfaces, plus concrete outbound types.
//!
//! The framework reads messages through the [`Message`] and [`MessageBatch`]
//! traits; hosts may implement them on their own types or use the provided
//! [`OutboundMessage`]/[`OutboundBatch`].

use crate::types::content::MessageContent;
use crate::types::endpoint::Endpoint;
use serde_json::Value;
use std::collections::HashMap;

/// An outbound message as seen by the framework.
pub trait Message: Send + Sync {
    /// Caller-assigned message identifier.
    fn id(&self) -> &str;

    /// Originating endpoint, when the channel requires one.
    fn sender(&self) -> Option<&Endpoint>;

    /// Destination endpoint.
    fn receiver(&self) -> &Endpoint;

    /// Message content.
    fn content(&self) -> &MessageContent;

    /// Open per-message property map (channel-specific fields).
    fn properties(&self) -> &HashMap<String, Value>;
}

/// A batch of outbound messages.
pub trait MessageBatch: Send + Sync {
    /// Caller-assigned batch identifier.
    fn id(&self) -> &str;

    /// The messages in the batch, in send order.
    fn messages(&self) -> &[Box<dyn Message>];
}

/// A plain outbound message.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// Message identifier.
    pub id: String,

    /// Originating endpoint, if any.
    pub sender: Option<Endpoint>,

    /// Destination endpoint.
    pub receiver: Endpoint,

    /// Message content.
    pub content: MessageContent,

    /// Channel-specific properties.
    pub properties: HashMap<String, Value>,
}

impl OutboundMessage {
    /// Create a message with a generated id.
    pub fn new(receiver: Endpoint, content: MessageContent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender: None,
            receiver,
            content,
            properties: HashMap::new(),
        }
    }

    /// Set the message id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the sender endpoint.
    pub fn with_sender(mut self, sender: Endpoint) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Set a channel-specific property.
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

impl Message for OutboundMessage {
    fn id(&self) -> &str {
        &self.id
    }

    fn sender(&self) -> Option<&Endpoint> {
        self.sender.as_ref()
    }

    fn receiver(&self) -> &Endpoint {
        &self.receiver
    }

    fn content(&self) -> &MessageContent {
        &self.content
    }

    fn properties(&self) -> &HashMap<String, Value> {
        &self.properties
    }
}

/// A plain batch of outbound messages.
pub struct OutboundBatch {
    /// Batch identifier.
    pub id: String,

    /// The messages in the batch.
    pub messages: Vec<Box<dyn Message>>,
}

impl OutboundBatch {
    /// Create an empty batch with a generated id.
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            messages: Vec::new(),
        }
    }

    /// Set the batch id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Add a message to the batch.
    pub fn push(&mut self, message: impl Message + 'static) {
        self.messages.push(Box::new(message));
    }

    /// Number of messages in the batch.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for OutboundBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBatch for OutboundBatch {
    fn id(&self) -> &str {
        &self.id
    }

    fn messages(&self) -> &[Box<dyn Message>] {
        &self.messages
    }
}
