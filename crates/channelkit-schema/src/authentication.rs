//! Declarative authentication configurations.
//!
//! An [`AuthenticationConfiguration`] names the settings fields that
//! satisfy one authentication method. The flexible variant (built with
//! [`AuthenticationConfiguration::flexible`]) is satisfied by any one of
//! several alternative field-name sets instead of a fixed required list.

use crate::settings::ConnectionSettings;
use channelkit_core::DataType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Authentication method category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationType {
    /// No authentication.
    #[default]
    None,

    /// Static API key.
    ApiKey,

    /// Static bearer/access token.
    Token,

    /// Username/password pair (HTTP Basic style).
    Basic,

    /// OAuth2 client-credentials grant.
    ClientCredentials,
}

impl fmt::Display for AuthenticationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::ApiKey => "api_key",
            Self::Token => "token",
            Self::Basic => "basic",
            Self::ClientCredentials => "client_credentials",
        };
        f.write_str(name)
    }
}

/// Semantic role of an authentication field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    /// Account or user name.
    Username,

    /// Account password or auth token half of a basic pair.
    Password,

    /// Static API key.
    ApiKey,

    /// Bearer/access token.
    Token,

    /// OAuth2 client id.
    ClientId,

    /// OAuth2 client secret.
    ClientSecret,

    /// OAuth2 token endpoint URL.
    TokenEndpoint,

    /// OAuth2 scope string.
    Scope,

    /// Anything else.
    #[default]
    Other,
}

/// One settings field referenced by an authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticationField {
    /// The settings key holding the value.
    pub name: String,

    /// Declared data type.
    pub data_type: DataType,

    /// Whether the value is sensitive.
    pub sensitive: bool,

    /// Closed set of accepted values; empty means unrestricted.
    pub allowed_values: Vec<Value>,

    /// Semantic role of the field.
    pub role: FieldRole,
}

impl AuthenticationField {
    /// Create a field with an explicit role. Sensitivity defaults on for
    /// secret-bearing roles.
    pub fn new(name: impl Into<String>, role: FieldRole) -> Self {
        let sensitive = matches!(
            role,
            FieldRole::Password | FieldRole::ApiKey | FieldRole::Token | FieldRole::ClientSecret
        );
        Self {
            name: name.into(),
            data_type: DataType::String,
            sensitive,
            allowed_values: Vec::new(),
            role,
        }
    }

    /// A `Username`-role field.
    pub fn username(name: impl Into<String>) -> Self {
        Self::new(name, FieldRole::Username)
    }

    /// A `Password`-role field.
    pub fn password(name: impl Into<String>) -> Self {
        Self::new(name, FieldRole::Password)
    }

    /// An `ApiKey`-role field.
    pub fn api_key(name: impl Into<String>) -> Self {
        Self::new(name, FieldRole::ApiKey)
    }

    /// A `Token`-role field.
    pub fn token(name: impl Into<String>) -> Self {
        Self::new(name, FieldRole::Token)
    }

    /// A `ClientId`-role field.
    pub fn client_id(name: impl Into<String>) -> Self {
        Self::new(name, FieldRole::ClientId)
    }

    /// A `ClientSecret`-role field.
    pub fn client_secret(name: impl Into<String>) -> Self {
        Self::new(name, FieldRole::ClientSecret)
    }

    /// A `TokenEndpoint`-role field.
    pub fn token_endpoint(name: impl Into<String>) -> Self {
        Self::new(name, FieldRole::TokenEndpoint)
    }

    /// Override the declared data type.
    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// Restrict the field to a closed value set.
    pub fn with_allowed_values(mut self, values: Vec<Value>) -> Self {
        self.allowed_values = values;
        self
    }

    /// Whether the settings carry a value for this field that conforms to
    /// its type and allowed-value set.
    pub fn is_satisfied_by(&self, settings: &ConnectionSettings) -> bool {
        match settings.get(&self.name) {
            Some(value) => {
                self.data_type.matches(&value)
                    && (self.allowed_values.is_empty() || self.allowed_values.contains(&value))
            }
            None => false,
        }
    }
}

/// A declarative description of one authentication method.
#[derive(Debug, Clone)]
pub struct AuthenticationConfiguration {
    /// The method category.
    pub auth_type: AuthenticationType,

    /// Display name used in validation messages.
    pub display_name: String,

    /// Fields that must all be present and valid.
    pub required_fields: Vec<AuthenticationField>,

    /// Fields that may be present. For a flexible non-Basic configuration
    /// these act as satisfiability alternatives, not as extras.
    pub optional_fields: Vec<AuthenticationField>,

    /// Alternative field-name sets for a flexible Basic configuration
    /// (e.g. Username/Password OR AccountSid/AuthToken). Empty for plain
    /// configurations.
    pub alternatives: Vec<Vec<AuthenticationField>>,

    /// Whether this is a flexible configuration.
    pub flexible: bool,
}

impl AuthenticationConfiguration {
    /// Create a plain configuration satisfied by its required fields.
    pub fn new(auth_type: AuthenticationType, display_name: impl Into<String>) -> Self {
        Self {
            auth_type,
            display_name: display_name.into(),
            required_fields: Vec::new(),
            optional_fields: Vec::new(),
            alternatives: Vec::new(),
            flexible: false,
        }
    }

    /// Create a flexible configuration: satisfied by any one complete
    /// alternative field set (Basic) or any one present optional field
    /// (other types).
    pub fn flexible(auth_type: AuthenticationType, display_name: impl Into<String>) -> Self {
        Self {
            flexible: true,
            ..Self::new(auth_type, display_name)
        }
    }

    /// Add a required field.
    pub fn with_required_field(mut self, field: AuthenticationField) -> Self {
        self.required_fields.push(field);
        self
    }

    /// Add an optional field.
    pub fn with_optional_field(mut self, field: AuthenticationField) -> Self {
        self.optional_fields.push(field);
        self
    }

    /// Add an alternative field set (flexible Basic configurations).
    pub fn with_alternative(mut self, fields: Vec<AuthenticationField>) -> Self {
        self.alternatives.push(fields);
        self
    }

    /// Every field name referenced anywhere in the configuration.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .required_fields
            .iter()
            .chain(self.optional_fields.iter())
            .chain(self.alternatives.iter().flatten())
            .map(|f| f.name.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Whether the configuration references a settings key (case-insensitive).
    pub fn references_field(&self, key: &str) -> bool {
        self.field_names()
            .iter()
            .any(|name| name.eq_ignore_ascii_case(key))
    }

    /// Whether the settings satisfy this configuration.
    pub fn is_satisfied_by(&self, settings: &ConnectionSettings) -> bool {
        self.satisfaction_failure(settings).is_none()
    }

    /// `None` when satisfied, otherwise the reason the settings fall short.
    pub fn satisfaction_failure(&self, settings: &ConnectionSettings) -> Option<String> {
        for field in &self.required_fields {
            if !field.is_satisfied_by(settings) {
                return Some(format!("required field {} is missing or invalid", field.name));
            }
        }

        if !self.flexible {
            return None;
        }

        if self.auth_type == AuthenticationType::Basic {
            // Any one complete alternative pair satisfies a flexible Basic
            // configuration; partial pairs never do.
            let satisfied = self
                .alternatives
                .iter()
                .any(|set| !set.is_empty() && set.iter().all(|f| f.is_satisfied_by(settings)));
            if satisfied {
                None
            } else {
                let names: Vec<String> = self
                    .alternatives
                    .iter()
                    .map(|set| {
                        set.iter()
                            .map(|f| f.name.as_str())
                            .collect::<Vec<_>>()
                            .join("+")
                    })
                    .collect();
                Some(format!(
                    "no complete credential pair present (expected one of: {})",
                    names.join(", ")
                ))
            }
        } else {
            let satisfied = self
                .optional_fields
                .iter()
                .any(|f| f.is_satisfied_by(settings));
            if satisfied {
                None
            } else {
                let names: Vec<&str> =
                    self.optional_fields.iter().map(|f| f.name.as_str()).collect();
                Some(format!(
                    "none of the accepted fields present (expected one of: {})",
                    names.join(", ")
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings_with(pairs: &[(&str, Value)]) -> ConnectionSettings {
        let mut settings = ConnectionSettings::new();
        for (k, v) in pairs {
            settings.set(*k, v.clone()).unwrap();
        }
        settings
    }

    #[test]
    fn test_plain_config_requires_all_fields() {
        let config = AuthenticationConfiguration::new(AuthenticationType::Basic, "Basic")
            .with_required_field(AuthenticationField::username("Username"))
            .with_required_field(AuthenticationField::password("Password"));

        let full = settings_with(&[("Username", json!("u")), ("Password", json!("p"))]);
        assert!(config.is_satisfied_by(&full));

        let half = settings_with(&[("Username", json!("u"))]);
        assert!(!config.is_satisfied_by(&half));
        assert!(config
            .satisfaction_failure(&half)
            .unwrap()
            .contains("Password"));
    }

    #[test]
    fn test_flexible_basic_any_complete_pair() {
        let config = AuthenticationConfiguration::flexible(AuthenticationType::Basic, "Basic")
            .with_alternative(vec![
                AuthenticationField::username("Username"),
                AuthenticationField::password("Password"),
            ])
            .with_alternative(vec![
                AuthenticationField::username("AccountSid"),
                AuthenticationField::password("AuthToken"),
            ]);

        let sid_pair =
            settings_with(&[("AccountSid", json!("AC123")), ("AuthToken", json!("tok"))]);
        assert!(config.is_satisfied_by(&sid_pair));

        // One half of each pair satisfies nothing.
        let halves =
            settings_with(&[("Username", json!("u")), ("AuthToken", json!("tok"))]);
        assert!(!config.is_satisfied_by(&halves));
    }

    #[test]
    fn test_flexible_non_basic_any_optional_field() {
        let config = AuthenticationConfiguration::flexible(AuthenticationType::ApiKey, "API key")
            .with_optional_field(AuthenticationField::api_key("ApiKey"))
            .with_optional_field(AuthenticationField::api_key("ServerKey"));

        assert!(config.is_satisfied_by(&settings_with(&[("ServerKey", json!("k"))])));
        assert!(!config.is_satisfied_by(&settings_with(&[("Other", json!("x"))])));
    }

    #[test]
    fn test_field_type_check() {
        let field = AuthenticationField::api_key("ApiKey");
        let settings = settings_with(&[("ApiKey", json!(42))]);
        assert!(!field.is_satisfied_by(&settings));
    }

    #[test]
    fn test_field_names_deduplicated() {
        let config = AuthenticationConfiguration::flexible(AuthenticationType::Basic, "Basic")
            .with_alternative(vec![
                AuthenticationField::username("Username"),
                AuthenticationField::password("Password"),
            ])
            .with_alternative(vec![
                AuthenticationField::username("Username"),
                AuthenticationField::password("Secret"),
            ]);

        assert_eq!(config.field_names(), vec!["Password", "Secret", "Username"]);
        assert!(config.references_field("username"));
        assert!(!config.references_field("ApiKey"));
    }
}
