//! Channel schema model and validation engine for ChannelKit.
//!
//! A [`ChannelSchema`] declares what a messaging channel accepts: its
//! connection parameters, message properties, endpoint and content types,
//! authentication methods, and capability flags. The schema validates
//! [`ConnectionSettings`] and outbound messages before a connector ever
//! touches a transport.

pub mod authentication;
pub mod error;
pub mod parameter;
pub mod schema;
pub mod settings;

pub use authentication::{
    AuthenticationConfiguration, AuthenticationField, AuthenticationType, FieldRole,
};
pub use error::{SchemaError, SettingsError};
pub use parameter::{ChannelParameter, MessagePropertyConfiguration};
pub use schema::{ChannelEndpointConfiguration, ChannelSchema, ChannelSchemaBuilder};
pub use settings::ConnectionSettings;
