//! Operation payload types.

use crate::state::ConnectorState;
use channelkit_core::{Endpoint, MessageContent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Acknowledgement that the provider accepted one message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendReceipt {
    /// The caller's message id.
    pub message_id: String,

    /// The provider's id for the message, when one was assigned.
    pub provider_message_id: Option<String>,

    /// When the provider accepted the message.
    pub accepted_at: DateTime<Utc>,

    /// Provider-specific metadata.
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl SendReceipt {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            provider_message_id: None,
            accepted_at: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_provider_message_id(mut self, id: impl Into<String>) -> Self {
        self.provider_message_id = Some(id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Acknowledgement for a batch, one receipt per accepted message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSendReceipt {
    pub batch_id: String,
    pub receipts: Vec<SendReceipt>,
}

impl BatchSendReceipt {
    pub fn new(batch_id: impl Into<String>) -> Self {
        Self {
            batch_id: batch_id.into(),
            receipts: Vec::new(),
        }
    }
}

/// Snapshot of a connector's identity and lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusInfo {
    pub provider: String,
    pub channel_type: String,
    pub state: ConnectorState,
    pub detail: Option<String>,
}

/// Provider-side delivery state of a previously sent message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    Queued,
    Sent,
    Delivered,
    Failed,
    #[default]
    Unknown,
}

/// One delivery-state change for one message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub message_id: String,
    pub state: DeliveryState,
    pub occurred_at: DateTime<Utc>,
    pub detail: Option<String>,
}

impl StatusUpdate {
    pub fn new(message_id: impl Into<String>, state: DeliveryState) -> Self {
        Self {
            message_id: message_id.into(),
            state,
            occurred_at: Utc::now(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// An inbound message pulled from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivedMessage {
    pub id: String,
    pub sender: Endpoint,
    pub receiver: Option<Endpoint>,
    pub content: MessageContent,
    #[serde(default)]
    pub properties: HashMap<String, Value>,
    pub received_at: DateTime<Utc>,
}

/// Result payload of a receive poll.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReceiveResult {
    pub messages: Vec<ReceivedMessage>,
}

/// Result payload of a status-update poll.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusUpdatesResult {
    pub updates: Vec<StatusUpdate>,
}

/// Health classification reported by a connector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Healthy,
    Degraded,
    Unhealthy,
    #[default]
    Unknown,
}

/// Outcome of a health probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorHealth {
    pub status: HealthState,
    pub latency_ms: Option<u64>,
    pub checked_at: DateTime<Utc>,
    pub error: Option<String>,
}

impl ConnectorHealth {
    fn with_status(status: HealthState) -> Self {
        Self {
            status,
            latency_ms: None,
            checked_at: Utc::now(),
            error: None,
        }
    }

    pub fn healthy(latency_ms: u64) -> Self {
        Self {
            latency_ms: Some(latency_ms),
            ..Self::with_status(HealthState::Healthy)
        }
    }

    pub fn degraded(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::with_status(HealthState::Degraded)
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::with_status(HealthState::Unhealthy)
        }
    }

    pub fn unknown() -> Self {
        Self::with_status(HealthState::Unknown)
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_send_receipt_builders() {
        let receipt = SendReceipt::new("m-1")
            .with_provider_message_id("p-9")
            .with_metadata("segments", json!(2));
        assert_eq!(receipt.provider_message_id.as_deref(), Some("p-9"));
        assert_eq!(receipt.metadata.get("segments"), Some(&json!(2)));
    }

    #[test]
    fn test_health_constructors() {
        assert!(ConnectorHealth::healthy(12).is_healthy());
        let bad = ConnectorHealth::unhealthy("refused");
        assert_eq!(bad.status, HealthState::Unhealthy);
        assert_eq!(bad.error.as_deref(), Some("refused"));
        assert_eq!(ConnectorHealth::unknown().status, HealthState::Unknown);
    }

    #[test]
    fn test_delivery_state_serde() {
        let json = serde_json::to_string(&DeliveryState::Delivered).unwrap();
        assert_eq!(json, "\"delivered\"");
    }
}
