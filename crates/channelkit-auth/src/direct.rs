//! Direct passthrough providers for static credentials.

use crate::credential::{property_keys, AuthenticationCredential};
use crate::error::{AuthError, AuthenticationResult};
use crate::provider::AuthenticationProvider;
use async_trait::async_trait;
use base64::Engine;
use channelkit_schema::{
    AuthenticationConfiguration, AuthenticationType, ConnectionSettings, FieldRole,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Common settings-key aliases for a static API key.
const API_KEY_ALIASES: &[&str] = &["ApiKey", "api_key", "apiKey", "Key", "ServerKey"];

/// Common settings-key aliases for a static bearer/access token.
const TOKEN_ALIASES: &[&str] = &["Token", "AccessToken", "BearerToken", "access_token"];

/// Common settings-key pairs for a basic credential.
const BASIC_PAIR_ALIASES: &[(&str, &str)] = &[
    ("Username", "Password"),
    ("AccountSid", "AuthToken"),
    ("User", "Pass"),
];

/// Passthrough provider for credentials that already live in the
/// settings: API keys, bearer tokens, and basic username/password pairs.
///
/// Resolution tries the configuration's own role-matching fields first,
/// then an ordered list of common aliases, and returns the first value
/// that resolves. Refresh re-reads the settings; direct credentials
/// never expire.
#[derive(Debug, Clone)]
pub struct DirectAuthenticationProvider {
    auth_type: AuthenticationType,
}

impl DirectAuthenticationProvider {
    /// Provider for static API keys.
    pub fn api_key() -> Self {
        Self {
            auth_type: AuthenticationType::ApiKey,
        }
    }

    /// Provider for static bearer/access tokens.
    pub fn bearer_token() -> Self {
        Self {
            auth_type: AuthenticationType::Token,
        }
    }

    /// Provider for basic username/password pairs.
    pub fn basic() -> Self {
        Self {
            auth_type: AuthenticationType::Basic,
        }
    }

    /// Candidate settings keys for a single-value credential: the
    /// configuration's fields with the given role, then the alias table.
    fn candidate_names<'a>(
        config: &'a AuthenticationConfiguration,
        role: FieldRole,
        aliases: &'a [&'a str],
    ) -> Vec<&'a str> {
        let mut names: Vec<&str> = config
            .required_fields
            .iter()
            .chain(config.optional_fields.iter())
            .filter(|f| f.role == role)
            .map(|f| f.name.as_str())
            .collect();
        for alias in aliases {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(alias)) {
                names.push(alias);
            }
        }
        names
    }

    fn resolve_single(
        &self,
        settings: &ConnectionSettings,
        config: &AuthenticationConfiguration,
        role: FieldRole,
        aliases: &[&str],
    ) -> Option<String> {
        Self::candidate_names(config, role, aliases)
            .iter()
            .find_map(|name| settings.get_string(name))
    }

    fn resolve_basic_pair(
        &self,
        settings: &ConnectionSettings,
        config: &AuthenticationConfiguration,
    ) -> Option<(String, String)> {
        // Alternative field sets declared by a flexible configuration come
        // first, then the common pair aliases.
        for alternative in &config.alternatives {
            let user = alternative
                .iter()
                .find(|f| f.role == FieldRole::Username)
                .and_then(|f| settings.get_string(&f.name));
            let pass = alternative
                .iter()
                .find(|f| f.role == FieldRole::Password)
                .and_then(|f| settings.get_string(&f.name));
            if let (Some(user), Some(pass)) = (user, pass) {
                return Some((user, pass));
            }
        }

        let user_name = Self::candidate_names(config, FieldRole::Username, &[])
            .first()
            .copied();
        let pass_name = Self::candidate_names(config, FieldRole::Password, &[])
            .first()
            .copied();
        if let (Some(user_name), Some(pass_name)) = (user_name, pass_name) {
            if let (Some(user), Some(pass)) = (
                settings.get_string(user_name),
                settings.get_string(pass_name),
            ) {
                return Some((user, pass));
            }
        }

        BASIC_PAIR_ALIASES.iter().find_map(|(user_key, pass_key)| {
            match (settings.get_string(user_key), settings.get_string(pass_key)) {
                (Some(user), Some(pass)) => Some((user, pass)),
                _ => None,
            }
        })
    }
}

#[async_trait]
impl AuthenticationProvider for DirectAuthenticationProvider {
    fn name(&self) -> &str {
        match self.auth_type {
            AuthenticationType::ApiKey => "direct-api-key",
            AuthenticationType::Token => "direct-token",
            AuthenticationType::Basic => "direct-basic",
            _ => "direct",
        }
    }

    fn can_handle(&self, config: &AuthenticationConfiguration) -> bool {
        config.auth_type == self.auth_type
    }

    async fn obtain_credential(
        &self,
        settings: &ConnectionSettings,
        config: &AuthenticationConfiguration,
        _cancel: &CancellationToken,
    ) -> AuthenticationResult {
        match self.auth_type {
            AuthenticationType::ApiKey => {
                let key = self
                    .resolve_single(settings, config, FieldRole::ApiKey, API_KEY_ALIASES)
                    .ok_or_else(|| AuthError::MissingFields {
                        auth_type: self.auth_type,
                        detail: "no API key field resolved".to_string(),
                    })?;
                debug!(provider = self.name(), "resolved API key from settings");
                Ok(AuthenticationCredential::new(self.auth_type, key))
            }
            AuthenticationType::Token => {
                let token = self
                    .resolve_single(settings, config, FieldRole::Token, TOKEN_ALIASES)
                    .ok_or_else(|| AuthError::MissingFields {
                        auth_type: self.auth_type,
                        detail: "no token field resolved".to_string(),
                    })?;
                debug!(provider = self.name(), "resolved token from settings");
                Ok(AuthenticationCredential::new(self.auth_type, token))
            }
            AuthenticationType::Basic => {
                let (user, pass) =
                    self.resolve_basic_pair(settings, config)
                        .ok_or_else(|| AuthError::MissingFields {
                            auth_type: self.auth_type,
                            detail: "no complete username/password pair resolved".to_string(),
                        })?;
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{user}:{pass}"));
                debug!(provider = self.name(), username = %user, "resolved basic pair");
                Ok(AuthenticationCredential::new(self.auth_type, encoded)
                    .with_property(property_keys::USERNAME, user))
            }
            other => Err(AuthError::Unsupported(other)),
        }
    }

    async fn refresh_credential(
        &self,
        _existing: &AuthenticationCredential,
        settings: &ConnectionSettings,
        config: &AuthenticationConfiguration,
        cancel: &CancellationToken,
    ) -> AuthenticationResult {
        // Direct credentials are settings-derived; refresh re-reads them.
        self.obtain_credential(settings, config, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use channelkit_schema::AuthenticationField;
    use serde_json::json;

    fn token() -> CancellationToken {
        CancellationToken::new()
    }

    fn settings_with(pairs: &[(&str, &str)]) -> ConnectionSettings {
        let mut settings = ConnectionSettings::new();
        for (k, v) in pairs {
            settings.set(*k, json!(v)).unwrap();
        }
        settings
    }

    #[tokio::test]
    async fn test_api_key_alias_resolution() {
        let provider = DirectAuthenticationProvider::api_key();
        let config = AuthenticationConfiguration::new(AuthenticationType::ApiKey, "API key");
        let settings = settings_with(&[("api_key", "sk-123")]);

        let cred = provider
            .obtain_credential(&settings, &config, &token())
            .await
            .unwrap();
        assert_eq!(cred.credential_value, "sk-123");
        assert!(cred.expires_at.is_none());
    }

    #[tokio::test]
    async fn test_configured_field_wins_over_alias() {
        let provider = DirectAuthenticationProvider::api_key();
        let config = AuthenticationConfiguration::new(AuthenticationType::ApiKey, "API key")
            .with_required_field(AuthenticationField::api_key("ServerKey"));
        let settings = settings_with(&[("ServerKey", "srv-1"), ("ApiKey", "generic")]);

        let cred = provider
            .obtain_credential(&settings, &config, &token())
            .await
            .unwrap();
        assert_eq!(cred.credential_value, "srv-1");
    }

    #[tokio::test]
    async fn test_token_missing_fields() {
        let provider = DirectAuthenticationProvider::bearer_token();
        let config = AuthenticationConfiguration::new(AuthenticationType::Token, "Token");
        let settings = settings_with(&[("Unrelated", "x")]);

        let result = provider.obtain_credential(&settings, &config, &token()).await;
        assert!(matches!(result, Err(AuthError::MissingFields { .. })));
    }

    #[tokio::test]
    async fn test_basic_pair_encoding() {
        let provider = DirectAuthenticationProvider::basic();
        let config = AuthenticationConfiguration::new(AuthenticationType::Basic, "Basic");
        let settings = settings_with(&[("Username", "u"), ("Password", "p")]);

        let cred = provider
            .obtain_credential(&settings, &config, &token())
            .await
            .unwrap();
        assert_eq!(
            cred.credential_value,
            base64::engine::general_purpose::STANDARD.encode("u:p")
        );
        assert_eq!(cred.username(), Some("u"));
    }

    #[tokio::test]
    async fn test_basic_account_sid_alias_pair() {
        let provider = DirectAuthenticationProvider::basic();
        let config = AuthenticationConfiguration::new(AuthenticationType::Basic, "Basic");
        let settings = settings_with(&[("AccountSid", "AC1"), ("AuthToken", "t1")]);

        let cred = provider
            .obtain_credential(&settings, &config, &token())
            .await
            .unwrap();
        assert_eq!(cred.username(), Some("AC1"));
    }

    #[tokio::test]
    async fn test_basic_half_pair_fails() {
        let provider = DirectAuthenticationProvider::basic();
        let config = AuthenticationConfiguration::new(AuthenticationType::Basic, "Basic");
        let settings = settings_with(&[("Username", "u"), ("AuthToken", "t1")]);

        let result = provider.obtain_credential(&settings, &config, &token()).await;
        assert!(matches!(result, Err(AuthError::MissingFields { .. })));
    }

    #[tokio::test]
    async fn test_flexible_alternative_resolution() {
        let provider = DirectAuthenticationProvider::basic();
        let config = AuthenticationConfiguration::flexible(AuthenticationType::Basic, "Basic")
            .with_alternative(vec![
                AuthenticationField::username("SenderId"),
                AuthenticationField::password("SenderSecret"),
            ]);
        let settings = settings_with(&[("SenderId", "s1"), ("SenderSecret", "sec")]);

        let cred = provider
            .obtain_credential(&settings, &config, &token())
            .await
            .unwrap();
        assert_eq!(cred.username(), Some("s1"));
    }

    #[test]
    fn test_can_handle_matches_type_only() {
        let provider = DirectAuthenticationProvider::api_key();
        let api = AuthenticationConfiguration::new(AuthenticationType::ApiKey, "API key");
        let basic = AuthenticationConfiguration::new(AuthenticationType::Basic, "Basic");
        assert!(provider.can_handle(&api));
        assert!(!provider.can_handle(&basic));
    }
}
