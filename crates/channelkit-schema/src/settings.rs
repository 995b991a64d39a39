//! Schema-aware connection settings store.

use crate::error::SettingsError;
use crate::schema::ChannelSchema;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A key/value parameter bag for connector configuration.
///
/// With a schema attached, every write naming a declared parameter or a
/// known authentication field is type- and allowed-value-checked
/// synchronously; violations are configuration errors, not validation
/// issues. Keys the schema does not recognize are accepted at write time;
/// strict-mode rejection of unknown keys belongs to
/// [`ChannelSchema::validate_connection_settings`].
#[derive(Debug, Clone, Default)]
pub struct ConnectionSettings {
    values: HashMap<String, Value>,
    schema: Option<Arc<ChannelSchema>>,
}

impl ConnectionSettings {
    /// Create an empty, schema-less settings bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty settings bag validated against `schema`.
    pub fn with_schema(schema: Arc<ChannelSchema>) -> Self {
        Self {
            values: HashMap::new(),
            schema: Some(schema),
        }
    }

    /// Attach (or replace) the validating schema. Existing values are not
    /// re-checked; run the schema's settings validation for that.
    pub fn attach_schema(&mut self, schema: Arc<ChannelSchema>) {
        self.schema = Some(schema);
    }

    /// The attached schema, if any.
    pub fn schema(&self) -> Option<&Arc<ChannelSchema>> {
        self.schema.as_ref()
    }

    /// Store a value, validating it against the schema when one is attached.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Result<(), SettingsError> {
        let key = key.into();
        if key.is_empty() {
            return Err(SettingsError::EmptyKey);
        }

        if let Some(schema) = &self.schema {
            if let Some(parameter) = schema.parameter(&key) {
                if !parameter.data_type.matches(&value) {
                    return Err(SettingsError::TypeMismatch {
                        key,
                        expected: parameter.data_type.name(),
                    });
                }
                if !parameter.allowed_values.is_empty()
                    && !parameter.allowed_values.contains(&value)
                {
                    return Err(SettingsError::ValueNotAllowed { key });
                }
            } else if let Some(field) = schema.authentication_field(&key) {
                if !field.data_type.matches(&value) {
                    return Err(SettingsError::TypeMismatch {
                        key,
                        expected: field.data_type.name(),
                    });
                }
            } else {
                debug!(key, "storing settings key not declared by the schema");
            }
        }

        self.values.insert(key, value);
        Ok(())
    }

    /// Read a value. Falls back to the schema parameter's declared default
    /// when the key is absent.
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.raw_get(key) {
            return Some(value.clone());
        }
        self.schema
            .as_ref()
            .and_then(|schema| schema.parameter(key))
            .and_then(|parameter| parameter.default_value.clone())
    }

    /// Read a stored value without default fallback (case-insensitive key
    /// match, mirroring the schema's name-uniqueness rule).
    pub fn raw_get(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.values.get(key) {
            return Some(value);
        }
        self.values
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Read a string value.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|v| v.as_str().map(str::to_owned))
    }

    /// Read a boolean value.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    /// Read an integer value.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.as_i64())
    }

    /// Read a numeric value.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.as_f64())
    }

    /// Whether a value is stored (or supplied by a schema default).
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove a stored value (case-insensitive key match, like reads).
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        if let Some(value) = self.values.remove(key) {
            return Some(value);
        }
        let stored = self
            .values
            .keys()
            .find(|k| k.eq_ignore_ascii_case(key))
            .cloned()?;
        self.values.remove(&stored)
    }

    /// The stored keys (defaults not included).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values are stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
