//! Core types for the ChannelKit connector framework.
//!
//! This crate defines the leaf vocabulary every other ChannelKit crate
//! builds on: endpoints, message content, the abstract message/batch
//! interface, channel capabilities, semantic data types, and validation
//! issues. It carries no behavior beyond simple predicates and holds no
//! dependencies on the schema, authentication, or connector layers.

pub mod types;

pub use types::capability::{Capability, ChannelCapabilities};
pub use types::content::{MessageContent, MessageContentType};
pub use types::data::DataType;
pub use types::endpoint::{Endpoint, EndpointType};
pub use types::message::{Message, MessageBatch, OutboundBatch, OutboundMessage};
pub use types::validation::{issue_codes, ValidationIssue, ValidationSeverity};
