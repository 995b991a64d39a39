//! Credential types.

use channelkit_schema::AuthenticationType;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Seconds before expiry at which a cached credential is refreshed
/// instead of returned.
pub const REFRESH_BUFFER_SECS: i64 = 300;

/// The refresh buffer as a [`chrono::Duration`].
pub fn refresh_buffer() -> Duration {
    Duration::seconds(REFRESH_BUFFER_SECS)
}

/// Well-known keys in [`AuthenticationCredential::properties`].
pub mod property_keys {
    /// OAuth2 token type (usually `Bearer`).
    pub const TOKEN_TYPE: &str = "token_type";
    /// Username behind a Basic credential.
    pub const USERNAME: &str = "username";
    /// OAuth2 refresh token.
    pub const REFRESH_TOKEN: &str = "refresh_token";
}

/// An obtained credential: an opaque value plus expiry metadata and an
/// open property bag.
#[derive(Debug, Clone)]
pub struct AuthenticationCredential {
    /// The method that produced the credential.
    pub auth_type: AuthenticationType,

    /// The opaque credential value (key, token, or encoded pair).
    pub credential_value: String,

    /// When the credential expires, if it does.
    pub expires_at: Option<DateTime<Utc>>,

    /// When the credential was obtained.
    pub obtained_at: DateTime<Utc>,

    /// Open metadata (token type, username, refresh token, ...).
    pub properties: HashMap<String, String>,
}

impl AuthenticationCredential {
    /// Create a non-expiring credential.
    pub fn new(auth_type: AuthenticationType, credential_value: impl Into<String>) -> Self {
        Self {
            auth_type,
            credential_value: credential_value.into(),
            expires_at: None,
            obtained_at: Utc::now(),
            properties: HashMap::new(),
        }
    }

    /// Set the expiry timestamp.
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Set a metadata property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Whether the credential is past its expiry.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }

    /// Whether the credential expires within `buffer` from now.
    pub fn will_expire_soon(&self, buffer: Duration) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now() + buffer)
    }

    /// The OAuth2 token type, when recorded.
    pub fn token_type(&self) -> Option<&str> {
        self.properties.get(property_keys::TOKEN_TYPE).map(String::as_str)
    }

    /// The username behind a Basic credential, when recorded.
    pub fn username(&self) -> Option<&str> {
        self.properties.get(property_keys::USERNAME).map(String::as_str)
    }

    /// The refresh token, when recorded.
    pub fn refresh_token(&self) -> Option<&str> {
        self.properties
            .get(property_keys::REFRESH_TOKEN)
            .map(String::as_str)
    }
}
