//! Shared fixtures for the integration test binaries.

use async_trait::async_trait;
use channelkit_auth::{AuthenticationCredential, AuthenticationProvider, AuthenticationResult};
use channelkit_connector::{ConnectorContext, ConnectorHandler, SendReceipt};
use channelkit_core::{
    ChannelCapabilities, DataType, EndpointType, Message, MessageContentType,
};
use channelkit_schema::{
    AuthenticationConfiguration, AuthenticationField, AuthenticationType,
    ChannelEndpointConfiguration, ChannelParameter, ChannelSchema, ConnectionSettings,
};
use chrono::{Duration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

/// A strict SMS-style schema: one required parameter, Basic
/// authentication, phone endpoints, plain-text content, send-only.
pub fn strict_basic_sms_schema() -> ChannelSchema {
    ChannelSchema::builder("acme", "sms", "1")
        .strict()
        .capabilities(ChannelCapabilities::send_only())
        .parameter(ChannelParameter::required("SenderId", DataType::String))
        .endpoint(ChannelEndpointConfiguration::bidirectional(
            EndpointType::PhoneNumber,
        ))
        .content_type(MessageContentType::PlainText)
        .authentication(
            AuthenticationConfiguration::new(AuthenticationType::Basic, "Basic")
                .with_required_field(AuthenticationField::username("Username"))
                .with_required_field(AuthenticationField::password("Password")),
        )
        .build()
        .expect("fixture schema builds")
}

/// A non-strict schema whose Basic authentication accepts either of two
/// alternative credential pairs.
pub fn flexible_basic_schema() -> ChannelSchema {
    ChannelSchema::builder("acme", "sms", "1")
        .capabilities(ChannelCapabilities::send_only())
        .endpoint(ChannelEndpointConfiguration::bidirectional(
            EndpointType::PhoneNumber,
        ))
        .authentication(
            AuthenticationConfiguration::flexible(AuthenticationType::Basic, "Basic")
                .with_alternative(vec![
                    AuthenticationField::username("Username"),
                    AuthenticationField::password("Password"),
                ])
                .with_alternative(vec![
                    AuthenticationField::username("AccountSid"),
                    AuthenticationField::password("AuthToken"),
                ]),
        )
        .build()
        .expect("fixture schema builds")
}

/// Build settings from string pairs, without a schema attached.
pub fn settings_from(pairs: &[(&str, &str)]) -> ConnectionSettings {
    let mut settings = ConnectionSettings::new();
    for (key, value) in pairs {
        settings
            .set(*key, serde_json::Value::String((*value).to_string()))
            .expect("schemaless set accepts any value");
    }
    settings
}

/// Provider stub that counts acquisitions and refreshes and issues
/// credentials with a fixed lifetime.
pub struct CountingProvider {
    pub obtain_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    ttl: Option<Duration>,
}

impl CountingProvider {
    /// Issue non-expiring credentials.
    pub fn non_expiring() -> Self {
        Self {
            obtain_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            ttl: None,
        }
    }

    /// Issue credentials expiring `ttl` from now.
    pub fn expiring_in(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::non_expiring()
        }
    }

    fn issue(&self, tag: String) -> AuthenticationResult {
        let mut credential = AuthenticationCredential::new(AuthenticationType::ApiKey, tag);
        if let Some(ttl) = self.ttl {
            credential = credential.with_expiry(Utc::now() + ttl);
        }
        Ok(credential)
    }
}

#[async_trait]
impl AuthenticationProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    fn can_handle(&self, _config: &AuthenticationConfiguration) -> bool {
        true
    }

    async fn obtain_credential(
        &self,
        _settings: &ConnectionSettings,
        _config: &AuthenticationConfiguration,
        _cancel: &CancellationToken,
    ) -> AuthenticationResult {
        let n = self.obtain_calls.fetch_add(1, Ordering::SeqCst);
        self.issue(format!("obtained-{n}"))
    }

    async fn refresh_credential(
        &self,
        _existing: &AuthenticationCredential,
        _settings: &ConnectionSettings,
        _config: &AuthenticationConfiguration,
        _cancel: &CancellationToken,
    ) -> AuthenticationResult {
        let n = self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.issue(format!("refreshed-{n}"))
    }
}

/// Handler stub that counts send invocations.
#[derive(Default)]
pub struct CountingHandler {
    pub send_calls: AtomicUsize,
}

#[async_trait]
impl ConnectorHandler for CountingHandler {
    async fn send(
        &self,
        _ctx: &ConnectorContext<'_>,
        message: &dyn Message,
    ) -> anyhow::Result<SendReceipt> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        Ok(SendReceipt::new(message.id()))
    }
}
