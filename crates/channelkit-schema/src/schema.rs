//! The channel schema and its validation engine.

use crate::authentication::{AuthenticationConfiguration, AuthenticationField, AuthenticationType};
use crate::error::SchemaError;
use crate::parameter::{ChannelParameter, MessagePropertyConfiguration};
use crate::settings::ConnectionSettings;
use channelkit_core::{
    issue_codes, Capability, ChannelCapabilities, EndpointType, Message, MessageContentType,
    ValidationIssue,
};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Declares an endpoint type a channel can address, and in which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelEndpointConfiguration {
    /// The endpoint type.
    pub endpoint_type: EndpointType,

    /// Whether messages may originate from this endpoint type.
    pub usable_as_sender: bool,

    /// Whether messages may be delivered to this endpoint type.
    pub usable_as_receiver: bool,
}

impl ChannelEndpointConfiguration {
    /// Usable in both directions.
    pub fn bidirectional(endpoint_type: EndpointType) -> Self {
        Self {
            endpoint_type,
            usable_as_sender: true,
            usable_as_receiver: true,
        }
    }

    /// Usable only as a message destination.
    pub fn receiver_only(endpoint_type: EndpointType) -> Self {
        Self {
            endpoint_type,
            usable_as_sender: false,
            usable_as_receiver: true,
        }
    }

    /// Usable only as a message origin.
    pub fn sender_only(endpoint_type: EndpointType) -> Self {
        Self {
            endpoint_type,
            usable_as_sender: true,
            usable_as_receiver: false,
        }
    }

    /// The wildcard entry accepting any endpoint type in both directions.
    pub fn any() -> Self {
        Self::bidirectional(EndpointType::Any)
    }
}

/// Direction of an endpoint check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndpointDirection {
    Sender,
    Receiver,
}

/// A channel's declarative schema: identity, capabilities, and the
/// parameters, properties, endpoints, content types, and authentication
/// methods it accepts.
///
/// Schemas are built once at startup via [`ChannelSchema::builder`] and
/// treated as immutable afterwards. The `without_*`/`restricted_to_*`
/// helpers derive narrower variants; keeping a derived schema a true
/// subset of its source is a documented convention the helpers do not
/// enforce.
#[derive(Debug, Clone)]
pub struct ChannelSchema {
    /// Provider identifier (e.g. "acme").
    pub provider: String,

    /// Channel type (e.g. "sms", "push", "email").
    pub channel_type: String,

    /// Schema version. Provider + channel type + version form the
    /// logical key.
    pub version: String,

    /// Whether undeclared settings keys and message properties are
    /// rejected.
    pub strict: bool,

    /// Declared connection parameters, in declaration order.
    pub parameters: Vec<ChannelParameter>,

    /// Declared message properties, in declaration order.
    pub message_properties: Vec<MessagePropertyConfiguration>,

    /// Declared endpoint configurations (at most one per endpoint type).
    pub endpoints: Vec<ChannelEndpointConfiguration>,

    /// Declared content types; empty means unrestricted.
    pub content_types: Vec<MessageContentType>,

    /// Authentication methods, in declaration (= preference) order.
    pub authentication: Vec<AuthenticationConfiguration>,

    /// Capability flags.
    pub capabilities: ChannelCapabilities,
}

impl ChannelSchema {
    /// Start building a schema for the given logical key.
    pub fn builder(
        provider: impl Into<String>,
        channel_type: impl Into<String>,
        version: impl Into<String>,
    ) -> ChannelSchemaBuilder {
        ChannelSchemaBuilder {
            provider: provider.into(),
            channel_type: channel_type.into(),
            version: version.into(),
            strict: false,
            parameters: Vec::new(),
            message_properties: Vec::new(),
            endpoints: Vec::new(),
            content_types: Vec::new(),
            authentication: Vec::new(),
            capabilities: ChannelCapabilities::default(),
        }
    }

    /// Look up a parameter by name (case-insensitive).
    pub fn parameter(&self, name: &str) -> Option<&ChannelParameter> {
        self.parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Look up a message property by name (case-insensitive).
    pub fn message_property(&self, name: &str) -> Option<&MessagePropertyConfiguration> {
        self.message_properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Look up an endpoint configuration by exact endpoint type.
    pub fn endpoint_configuration(
        &self,
        endpoint_type: EndpointType,
    ) -> Option<&ChannelEndpointConfiguration> {
        self.endpoints
            .iter()
            .find(|e| e.endpoint_type == endpoint_type)
    }

    /// Look up an authentication configuration by type.
    pub fn authentication_configuration(
        &self,
        auth_type: AuthenticationType,
    ) -> Option<&AuthenticationConfiguration> {
        self.authentication.iter().find(|a| a.auth_type == auth_type)
    }

    /// Look up an authentication field by settings key across every
    /// configured method (case-insensitive).
    pub fn authentication_field(&self, key: &str) -> Option<&AuthenticationField> {
        self.authentication.iter().find_map(|config| {
            config
                .required_fields
                .iter()
                .chain(config.optional_fields.iter())
                .chain(config.alternatives.iter().flatten())
                .find(|f| f.name.eq_ignore_ascii_case(key))
        })
    }

    /// Whether the channel declares the content type (an empty list means
    /// unrestricted).
    pub fn supports_content_type(&self, content_type: MessageContentType) -> bool {
        self.content_types.is_empty() || self.content_types.contains(&content_type)
    }

    /// Whether the capability flag is set.
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.supports(capability)
    }

    fn supports_endpoint(&self, endpoint_type: EndpointType, direction: EndpointDirection) -> bool {
        // An empty endpoint list means the channel declares no endpoint
        // restrictions at all.
        if self.endpoints.is_empty() {
            return true;
        }
        self.endpoints.iter().any(|config| {
            let direction_ok = match direction {
                EndpointDirection::Sender => config.usable_as_sender,
                EndpointDirection::Receiver => config.usable_as_receiver,
            };
            direction_ok && config.endpoint_type.accepts(endpoint_type)
        })
    }

    // --- derivation -----------------------------------------------------

    /// Derive a schema without the named parameter.
    pub fn without_parameter(&self, name: &str) -> ChannelSchema {
        let mut derived = self.clone();
        derived
            .parameters
            .retain(|p| !p.name.eq_ignore_ascii_case(name));
        derived
    }

    /// Derive a schema without the named message property.
    pub fn without_message_property(&self, name: &str) -> ChannelSchema {
        let mut derived = self.clone();
        derived
            .message_properties
            .retain(|p| !p.name.eq_ignore_ascii_case(name));
        derived
    }

    /// Derive a schema restricted to the given content types.
    pub fn restricted_to_content_types(&self, content_types: &[MessageContentType]) -> ChannelSchema {
        let mut derived = self.clone();
        derived.content_types = content_types.to_vec();
        derived
    }

    /// Derive a schema restricted to the given capability set.
    pub fn restricted_to_capabilities(&self, capabilities: ChannelCapabilities) -> ChannelSchema {
        let mut derived = self.clone();
        derived.capabilities = capabilities;
        derived
    }

    // --- validation engine ----------------------------------------------

    /// Validate connection settings against the schema.
    ///
    /// Runs, in order: required-parameter presence, per-parameter
    /// compliance, authentication satisfiability, and (in strict mode)
    /// unknown-key rejection. An empty list means the settings are valid.
    pub fn validate_connection_settings(
        &self,
        settings: &ConnectionSettings,
    ) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        // 1. Required-parameter presence. A declared default counts as
        //    presence.
        for parameter in &self.parameters {
            if parameter.required
                && settings.raw_get(&parameter.name).is_none()
                && parameter.default_value.is_none()
            {
                issues.push(ValidationIssue::error(
                    &parameter.name,
                    issue_codes::REQUIRED_PARAMETER_MISSING,
                    "required parameter is missing",
                ));
            }
        }

        // 2. Per-parameter compliance. Absent optionals and default-backed
        //    values are skipped: only explicitly stored values are checked.
        for parameter in &self.parameters {
            if let Some(value) = settings.raw_get(&parameter.name) {
                issues.extend(parameter.validate_value(value));
            }
        }

        // 3. Authentication satisfiability: first satisfied configuration
        //    wins, in declaration order, `None` excluded.
        issues.extend(self.validate_authentication(settings));

        // 4. Strict mode: reject keys that are neither parameters nor
        //    fields of any configured authentication method.
        if self.strict {
            for key in settings.keys() {
                let known = self.parameter(key).is_some()
                    || self.authentication.iter().any(|a| a.references_field(key));
                if !known {
                    issues.push(ValidationIssue::error(
                        key,
                        issue_codes::UNKNOWN_PARAMETER,
                        "unknown parameter for strict schema",
                    ));
                }
            }
        }

        issues
    }

    fn validate_authentication(&self, settings: &ConnectionSettings) -> Vec<ValidationIssue> {
        let candidates: Vec<&AuthenticationConfiguration> = self
            .authentication
            .iter()
            .filter(|a| a.auth_type != AuthenticationType::None)
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }

        let mut failures = Vec::new();
        for config in &candidates {
            match config.satisfaction_failure(settings) {
                None => {
                    debug!(auth_type = %config.auth_type, "authentication configuration satisfied");
                    return Vec::new();
                }
                Some(reason) => failures.push(format!("{}: {reason}", config.auth_type)),
            }
        }

        vec![ValidationIssue::error(
            "authentication",
            issue_codes::AUTHENTICATION_NOT_SATISFIED,
            format!(
                "no authentication method satisfied ({})",
                failures.join("; ")
            ),
        )]
    }

    /// Validate message properties against the schema.
    pub fn validate_message_properties(
        &self,
        properties: &HashMap<String, Value>,
    ) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        let lookup = |name: &str| {
            properties
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v)
        };

        for property in &self.message_properties {
            if property.required
                && lookup(&property.name).is_none()
                && property.default_value.is_none()
            {
                issues.push(ValidationIssue::error(
                    &property.name,
                    issue_codes::REQUIRED_PROPERTY_MISSING,
                    "required property is missing",
                ));
            }
        }

        for property in &self.message_properties {
            if let Some(value) = lookup(&property.name) {
                issues.extend(property.validate_value(value));
            }
        }

        if self.strict {
            for key in properties.keys() {
                if self.message_property(key).is_none() {
                    issues.push(ValidationIssue::error(
                        key,
                        issue_codes::UNKNOWN_PROPERTY,
                        "unknown property for strict schema",
                    ));
                }
            }
        }

        issues
    }

    /// Validate a whole message: endpoint support in each direction,
    /// content-type support, and property compliance.
    pub fn validate_message(&self, message: &dyn Message) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if let Some(sender) = message.sender() {
            if !self.supports_endpoint(sender.endpoint_type, EndpointDirection::Sender) {
                issues.push(ValidationIssue::error(
                    "sender",
                    issue_codes::UNSUPPORTED_ENDPOINT,
                    format!(
                        "endpoint type {:?} is not configured as a sender",
                        sender.endpoint_type
                    ),
                ));
            }
        }

        let receiver = message.receiver();
        if !self.supports_endpoint(receiver.endpoint_type, EndpointDirection::Receiver) {
            issues.push(ValidationIssue::error(
                "receiver",
                issue_codes::UNSUPPORTED_ENDPOINT,
                format!(
                    "endpoint type {:?} is not configured as a receiver",
                    receiver.endpoint_type
                ),
            ));
        }

        let content_type = message.content().content_type;
        if !self.supports_content_type(content_type) {
            issues.push(ValidationIssue::error(
                "content",
                issue_codes::UNSUPPORTED_CONTENT_TYPE,
                format!("content type {content_type:?} is not declared by the channel"),
            ));
        }

        issues.extend(self.validate_message_properties(message.properties()));
        issues
    }
}

/// Builder assembling an immutable [`ChannelSchema`].
///
/// Uniqueness invariants (case-insensitive parameter/property names, one
/// authentication configuration per type, one endpoint configuration per
/// endpoint type) are enforced at [`ChannelSchemaBuilder::build`].
#[derive(Debug)]
pub struct ChannelSchemaBuilder {
    provider: String,
    channel_type: String,
    version: String,
    strict: bool,
    parameters: Vec<ChannelParameter>,
    message_properties: Vec<MessagePropertyConfiguration>,
    endpoints: Vec<ChannelEndpointConfiguration>,
    content_types: Vec<MessageContentType>,
    authentication: Vec<AuthenticationConfiguration>,
    capabilities: ChannelCapabilities,
}

impl ChannelSchemaBuilder {
    /// Enable strict mode: undeclared settings keys and message
    /// properties fail validation.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Set the capability flags.
    pub fn capabilities(mut self, capabilities: ChannelCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Declare a connection parameter.
    pub fn parameter(mut self, parameter: ChannelParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Declare a message property.
    pub fn message_property(mut self, property: MessagePropertyConfiguration) -> Self {
        self.message_properties.push(property);
        self
    }

    /// Declare an endpoint configuration.
    pub fn endpoint(mut self, endpoint: ChannelEndpointConfiguration) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// Declare a supported content type.
    pub fn content_type(mut self, content_type: MessageContentType) -> Self {
        self.content_types.push(content_type);
        self
    }

    /// Declare an authentication method. Declaration order is the
    /// satisfiability preference order.
    pub fn authentication(mut self, configuration: AuthenticationConfiguration) -> Self {
        self.authentication.push(configuration);
        self
    }

    /// Build the schema, enforcing the uniqueness invariants.
    pub fn build(self) -> Result<ChannelSchema, SchemaError> {
        for (i, parameter) in self.parameters.iter().enumerate() {
            if self.parameters[..i]
                .iter()
                .any(|p| p.name.eq_ignore_ascii_case(&parameter.name))
            {
                return Err(SchemaError::DuplicateParameter(parameter.name.clone()));
            }
        }

        for (i, property) in self.message_properties.iter().enumerate() {
            if self.message_properties[..i]
                .iter()
                .any(|p| p.name.eq_ignore_ascii_case(&property.name))
            {
                return Err(SchemaError::DuplicateProperty(property.name.clone()));
            }
        }

        for (i, config) in self.authentication.iter().enumerate() {
            if self.authentication[..i]
                .iter()
                .any(|a| a.auth_type == config.auth_type)
            {
                return Err(SchemaError::DuplicateAuthenticationType(config.auth_type));
            }
        }

        for (i, endpoint) in self.endpoints.iter().enumerate() {
            if self.endpoints[..i]
                .iter()
                .any(|e| e.endpoint_type == endpoint.endpoint_type)
            {
                return Err(SchemaError::DuplicateEndpointType(endpoint.endpoint_type));
            }
        }

        Ok(ChannelSchema {
            provider: self.provider,
            channel_type: self.channel_type,
            version: self.version,
            strict: self.strict,
            parameters: self.parameters,
            message_properties: self.message_properties,
            endpoints: self.endpoints,
            content_types: self.content_types,
            authentication: self.authentication,
            capabilities: self.capabilities,
        })
    }
}
