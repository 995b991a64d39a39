//! Message endpoint types.

use serde::{Deserialize, Serialize};

/// Kind of address a message can originate from or be delivered to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointType {
    /// Wildcard: matches any endpoint type.
    #[default]
    Any,

    /// E.164-style phone number (SMS, voice).
    PhoneNumber,

    /// Email address.
    Email,

    /// Push notification device token.
    DeviceToken,

    /// Provider-scoped user identifier.
    UserId,

    /// Publish/subscribe topic.
    Topic,

    /// Webhook or callback URL.
    Url,
}

impl EndpointType {
    /// Check whether this type accepts the other, treating [`EndpointType::Any`]
    /// as a wildcard on either side.
    pub fn accepts(&self, other: EndpointType) -> bool {
        *self == EndpointType::Any || other == EndpointType::Any || *self == other
    }
}

/// A concrete message endpoint: an address tagged with its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// The kind of address.
    pub endpoint_type: EndpointType,

    /// The address itself (phone number, email, token, ...).
    pub address: String,
}

impl Endpoint {
    /// Create a new endpoint.
    pub fn new(endpoint_type: EndpointType, address: impl Into<String>) -> Self {
        Self {
            endpoint_type,
            address: address.into(),
        }
    }

    /// Create a phone-number endpoint.
    pub fn phone(address: impl Into<String>) -> Self {
        Self::new(EndpointType::PhoneNumber, address)
    }

    /// Create an email endpoint.
    pub fn email(address: impl Into<String>) -> Self {
        Self::new(EndpointType::Email, address)
    }

    /// Create a device-token endpoint.
    pub fn device_token(address: impl Into<String>) -> Self {
        Self::new(EndpointType::DeviceToken, address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_type_accepts_exact() {
        assert!(EndpointType::Email.accepts(EndpointType::Email));
        assert!(!EndpointType::Email.accepts(EndpointType::PhoneNumber));
    }

    #[test]
    fn test_endpoint_type_any_is_wildcard() {
        assert!(EndpointType::Any.accepts(EndpointType::DeviceToken));
        assert!(EndpointType::DeviceToken.accepts(EndpointType::Any));
    }

    #[test]
    fn test_endpoint_constructors() {
        let ep = Endpoint::phone("+15551234567");
        assert_eq!(ep.endpoint_type, EndpointType::PhoneNumber);
        assert_eq!(ep.address, "+15551234567");

        let ep = Endpoint::email("a@b.example");
        assert_eq!(ep.endpoint_type, EndpointType::Email);
    }

    #[test]
    fn test_endpoint_type_serde_roundtrip() {
        let types = [
            EndpointType::Any,
            EndpointType::PhoneNumber,
            EndpointType::Email,
            EndpointType::DeviceToken,
            EndpointType::UserId,
            EndpointType::Topic,
            EndpointType::Url,
        ];
        for t in &types {
            let json = serde_json::to_string(t).unwrap();
            let parsed: EndpointType = serde_json::from_str(&json).unwrap();
            assert_eq!(*t, parsed);
        }
    }
}
