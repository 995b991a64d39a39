//! Connector lifecycle and operation pipeline for ChannelKit.
//!
//! A [`ChannelConnector`] wraps a provider-specific [`ConnectorHandler`]
//! with the lifecycle state machine, capability and state gates, schema
//! validation before any send, and credential management. Operations
//! return [`ConnectorResult`] values carrying standardized error codes
//! instead of propagating handler failures.

pub mod connector;
pub mod handler;
pub mod result;
pub mod state;
pub mod types;

pub use connector::ChannelConnector;
pub use handler::{ConnectorContext, ConnectorHandler};
pub use result::{error_codes, ConnectorError, ConnectorResult};
pub use state::ConnectorState;
pub use types::{
    BatchSendReceipt, ConnectorHealth, DeliveryState, HealthState, ReceiveResult,
    ReceivedMessage, SendReceipt, StatusInfo, StatusUpdate, StatusUpdatesResult,
};
