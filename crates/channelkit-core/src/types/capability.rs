//! Channel capability flags.

use serde::{Deserialize, Serialize};

/// An operation category a connector may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Single-message sending.
    Send,

    /// Batch (bulk) sending.
    BulkSend,

    /// Querying delivery status of a sent message.
    MessageStatus,

    /// Pulling inbound messages.
    Receive,

    /// Pulling inbound status updates (delivery receipts).
    ReceiveStatus,

    /// Health-check reporting.
    HealthCheck,
}

impl Capability {
    /// All capability flags.
    pub fn all() -> &'static [Capability] {
        &[
            Self::Send,
            Self::BulkSend,
            Self::MessageStatus,
            Self::Receive,
            Self::ReceiveStatus,
            Self::HealthCheck,
        ]
    }
}

/// The set of capabilities a channel declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelCapabilities {
    /// Supports single-message sending.
    #[serde(default)]
    pub send: bool,

    /// Supports batch sending.
    #[serde(default)]
    pub bulk_send: bool,

    /// Supports message-status queries.
    #[serde(default)]
    pub message_status: bool,

    /// Supports receiving inbound messages.
    #[serde(default)]
    pub receive: bool,

    /// Supports receiving status updates.
    #[serde(default)]
    pub receive_status: bool,

    /// Supports health checks.
    #[serde(default)]
    pub health_check: bool,
}

impl ChannelCapabilities {
    /// Capabilities with nothing enabled.
    pub fn none() -> Self {
        Self::default()
    }

    /// Send-only capabilities (the minimal useful connector).
    pub fn send_only() -> Self {
        Self {
            send: true,
            ..Self::default()
        }
    }

    /// Check whether a capability flag is set.
    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Send => self.send,
            Capability::BulkSend => self.bulk_send,
            Capability::MessageStatus => self.message_status,
            Capability::Receive => self.receive,
            Capability::ReceiveStatus => self.receive_status,
            Capability::HealthCheck => self.health_check,
        }
    }

    /// Enable single-message sending.
    pub fn with_send(mut self) -> Self {
        self.send = true;
        self
    }

    /// Enable batch sending.
    pub fn with_bulk_send(mut self) -> Self {
        self.bulk_send = true;
        self
    }

    /// Enable message-status queries.
    pub fn with_message_status(mut self) -> Self {
        self.message_status = true;
        self
    }

    /// Enable inbound message receiving.
    pub fn with_receive(mut self) -> Self {
        self.receive = true;
        self
    }

    /// Enable inbound status-update receiving.
    pub fn with_receive_status(mut self) -> Self {
        self.receive_status = true;
        self
    }

    /// Enable health checks.
    pub fn with_health_check(mut self) -> Self {
        self.health_check = true;
        self
    }

    /// The flags that are set, as a list.
    pub fn enabled(&self) -> Vec<Capability> {
        Capability::all()
            .iter()
            .copied()
            .filter(|c| self.supports(*c))
            .collect()
    }
}
