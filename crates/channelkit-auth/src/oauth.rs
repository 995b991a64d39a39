//! OAuth2 client-credentials provider.

use crate::credential::{property_keys, AuthenticationCredential};
use crate::error::{AuthError, AuthenticationResult};
use crate::provider::AuthenticationProvider;
use async_trait::async_trait;
use channelkit_schema::{
    AuthenticationConfiguration, AuthenticationType, ConnectionSettings, FieldRole,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const TOKEN_ENDPOINT_ALIASES: &[&str] = &["TokenEndpoint", "TokenUrl", "token_url"];
const CLIENT_ID_ALIASES: &[&str] = &["ClientId", "client_id"];
const CLIENT_SECRET_ALIASES: &[&str] = &["ClientSecret", "client_secret"];
const SCOPE_ALIASES: &[&str] = &["Scope", "scope"];

/// Standard OAuth2 token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Provider performing an OAuth2 client-credentials token exchange.
///
/// Refresh attempts a refresh-token grant first and falls back to a fresh
/// client-credentials exchange when the refresh request itself is
/// rejected with a non-2xx status.
#[derive(Debug, Clone)]
pub struct ClientCredentialsProvider {
    http: reqwest::Client,
}

impl Default for ClientCredentialsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientCredentialsProvider {
    /// Create a provider with a default HTTP client.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Create a provider reusing an existing HTTP client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    fn resolve(
        settings: &ConnectionSettings,
        config: &AuthenticationConfiguration,
        role: FieldRole,
        aliases: &[&str],
    ) -> Option<String> {
        config
            .required_fields
            .iter()
            .chain(config.optional_fields.iter())
            .filter(|f| f.role == role)
            .map(|f| f.name.as_str())
            .chain(aliases.iter().copied())
            .find_map(|name| settings.get_string(name))
    }

    async fn exchange(
        &self,
        token_url: &str,
        form: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Result<TokenResponse, AuthError> {
        let request = self
            .http
            .post(token_url)
            .header("Accept", "application/json")
            .form(form);

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(AuthError::Cancelled),
            result = request.send() => result?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenEndpoint {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        if parsed.access_token.is_empty() {
            return Err(AuthError::InvalidResponse(
                "empty access_token in response".to_string(),
            ));
        }
        Ok(parsed)
    }

    fn credential_from(response: TokenResponse) -> AuthenticationCredential {
        let mut credential = AuthenticationCredential::new(
            AuthenticationType::ClientCredentials,
            response.access_token,
        );
        if let Some(expires_in) = response.expires_in {
            credential = credential.with_expiry(Utc::now() + Duration::seconds(expires_in));
        }
        if let Some(token_type) = response.token_type {
            credential = credential.with_property(property_keys::TOKEN_TYPE, token_type);
        }
        if let Some(refresh_token) = response.refresh_token {
            credential = credential.with_property(property_keys::REFRESH_TOKEN, refresh_token);
        }
        credential
    }

    fn request_inputs(
        settings: &ConnectionSettings,
        config: &AuthenticationConfiguration,
    ) -> Result<(String, String, String, Option<String>), AuthError> {
        let missing = |what: &str| AuthError::MissingFields {
            auth_type: AuthenticationType::ClientCredentials,
            detail: format!("no {what} field resolved"),
        };
        let token_url = Self::resolve(settings, config, FieldRole::TokenEndpoint, TOKEN_ENDPOINT_ALIASES)
            .ok_or_else(|| missing("token endpoint"))?;
        let client_id = Self::resolve(settings, config, FieldRole::ClientId, CLIENT_ID_ALIASES)
            .ok_or_else(|| missing("client id"))?;
        let client_secret =
            Self::resolve(settings, config, FieldRole::ClientSecret, CLIENT_SECRET_ALIASES)
                .ok_or_else(|| missing("client secret"))?;
        let scope = Self::resolve(settings, config, FieldRole::Scope, SCOPE_ALIASES);
        Ok((token_url, client_id, client_secret, scope))
    }
}

#[async_trait]
impl AuthenticationProvider for ClientCredentialsProvider {
    fn name(&self) -> &str {
        "oauth2-client-credentials"
    }

    fn can_handle(&self, config: &AuthenticationConfiguration) -> bool {
        config.auth_type == AuthenticationType::ClientCredentials
    }

    async fn obtain_credential(
        &self,
        settings: &ConnectionSettings,
        config: &AuthenticationConfiguration,
        cancel: &CancellationToken,
    ) -> AuthenticationResult {
        let (token_url, client_id, client_secret, scope) =
            Self::request_inputs(settings, config)?;

        let mut form = vec![
            ("grant_type", "client_credentials"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
        ];
        if let Some(scope) = scope.as_deref() {
            form.push(("scope", scope));
        }

        debug!(provider = self.name(), token_url = %token_url, "requesting token");
        let response = self.exchange(&token_url, &form, cancel).await?;
        Ok(Self::credential_from(response))
    }

    async fn refresh_credential(
        &self,
        existing: &AuthenticationCredential,
        settings: &ConnectionSettings,
        config: &AuthenticationConfiguration,
        cancel: &CancellationToken,
    ) -> AuthenticationResult {
        if let Some(refresh_token) = existing.refresh_token() {
            let (token_url, client_id, client_secret, _) =
                Self::request_inputs(settings, config)?;
            let form = vec![
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
            ];

            debug!(provider = self.name(), "attempting refresh-token grant");
            match self.exchange(&token_url, &form, cancel).await {
                Ok(response) => return Ok(Self::credential_from(response)),
                Err(AuthError::TokenEndpoint { status, .. }) => {
                    // Rejected refresh: fall through to a fresh exchange.
                    warn!(
                        provider = self.name(),
                        status, "refresh-token grant rejected, retrying client-credentials"
                    );
                }
                Err(other) => return Err(other),
            }
        }

        self.obtain_credential(settings, config, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use channelkit_schema::AuthenticationField;
    use serde_json::json;

    #[test]
    fn test_token_response_deserialization() {
        let json = r#"{
            "access_token": "at-1",
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "rt-1"
        }"#;
        let parsed: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.access_token, "at-1");
        assert_eq!(parsed.expires_in, Some(3600));
    }

    #[test]
    fn test_token_response_minimal() {
        let parsed: TokenResponse = serde_json::from_str(r#"{"access_token": "at"}"#).unwrap();
        assert!(parsed.token_type.is_none());
        assert!(parsed.expires_in.is_none());
        assert!(parsed.refresh_token.is_none());
    }

    #[test]
    fn test_credential_from_response_sets_expiry() {
        let response = TokenResponse {
            access_token: "at".to_string(),
            token_type: Some("Bearer".to_string()),
            expires_in: Some(3600),
            refresh_token: Some("rt".to_string()),
        };
        let credential = ClientCredentialsProvider::credential_from(response);
        assert_eq!(credential.credential_value, "at");
        assert!(credential.expires_at.is_some());
        assert_eq!(credential.token_type(), Some("Bearer"));
        assert_eq!(credential.refresh_token(), Some("rt"));
    }

    #[test]
    fn test_request_inputs_resolution() {
        let config = AuthenticationConfiguration::new(
            AuthenticationType::ClientCredentials,
            "OAuth2",
        )
        .with_required_field(AuthenticationField::token_endpoint("TokenEndpoint"))
        .with_required_field(AuthenticationField::client_id("ClientId"))
        .with_required_field(AuthenticationField::client_secret("ClientSecret"));

        let mut settings = ConnectionSettings::new();
        settings.set("TokenEndpoint", json!("https://auth.example/token")).unwrap();
        settings.set("ClientId", json!("cid")).unwrap();
        settings.set("ClientSecret", json!("secret")).unwrap();

        let (url, id, secret, scope) =
            ClientCredentialsProvider::request_inputs(&settings, &config).unwrap();
        assert_eq!(url, "https://auth.example/token");
        assert_eq!(id, "cid");
        assert_eq!(secret, "secret");
        assert!(scope.is_none());
    }

    #[test]
    fn test_request_inputs_missing_secret() {
        let config =
            AuthenticationConfiguration::new(AuthenticationType::ClientCredentials, "OAuth2");
        let mut settings = ConnectionSettings::new();
        settings.set("TokenEndpoint", json!("https://auth.example/token")).unwrap();
        settings.set("ClientId", json!("cid")).unwrap();

        let result = ClientCredentialsProvider::request_inputs(&settings, &config);
        assert!(matches!(result, Err(AuthError::MissingFields { .. })));
    }

    #[test]
    fn test_can_handle() {
        let provider = ClientCredentialsProvider::new();
        let config =
            AuthenticationConfiguration::new(AuthenticationType::ClientCredentials, "OAuth2");
        assert!(provider.can_handle(&config));
        let basic = AuthenticationConfiguration::new(AuthenticationType::Basic, "Basic");
        assert!(!provider.can_handle(&basic));
    }
}
