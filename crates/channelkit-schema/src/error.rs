//! Schema and settings error types.

use crate::authentication::AuthenticationType;
use channelkit_core::EndpointType;
use thiserror::Error;

/// Errors raised while building a [`crate::ChannelSchema`].
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Two parameters share a name (case-insensitive).
    #[error("Duplicate parameter name: {0}")]
    DuplicateParameter(String),

    /// Two message properties share a name (case-insensitive).
    #[error("Duplicate message property name: {0}")]
    DuplicateProperty(String),

    /// Two authentication configurations share a type.
    #[error("Duplicate authentication configuration for type: {0}")]
    DuplicateAuthenticationType(AuthenticationType),

    /// Two endpoint configurations share an endpoint type.
    #[error("Duplicate endpoint configuration for type: {0:?}")]
    DuplicateEndpointType(EndpointType),

    /// A message-property pattern failed to compile.
    #[error("Invalid pattern for property {property}: {source}")]
    InvalidPattern {
        /// The property carrying the pattern.
        property: String,
        /// The regex compile error.
        source: regex::Error,
    },
}

/// Configuration errors raised at settings write time.
///
/// These indicate a schema/settings mismatch detected synchronously when a
/// value is stored, as opposed to the non-fatal issues collected by the
/// validation engine.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The key is empty.
    #[error("Settings key must not be empty")]
    EmptyKey,

    /// The value does not conform to the declared data type.
    #[error("Value for {key} does not match declared type {expected}")]
    TypeMismatch {
        /// The offending settings key.
        key: String,
        /// The declared type name.
        expected: &'static str,
    },

    /// The value is outside the declared allowed-value set.
    #[error("Value for {key} is not in the allowed-value set")]
    ValueNotAllowed {
        /// The offending settings key.
        key: String,
    },
}
