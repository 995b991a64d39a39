//! Connection parameters and message property configurations.

use channelkit_core::{issue_codes, DataType, ValidationIssue};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Validator hook for message properties with semantics the built-in
/// checks cannot express (mixed-type fields, cross-format dates, ...).
pub type PropertyValidator = Arc<dyn Fn(&Value) -> Vec<ValidationIssue> + Send + Sync>;

/// A connection parameter declared by a channel schema.
///
/// Identity (name, type) is fixed at construction; secondary attributes
/// are set through the `with_*` helpers before the schema is built.
#[derive(Debug, Clone)]
pub struct ChannelParameter {
    /// Parameter name (unique within the schema, case-insensitive).
    pub name: String,

    /// Declared data type.
    pub data_type: DataType,

    /// Whether the parameter must be present in the settings.
    pub required: bool,

    /// Whether the value is sensitive (credentials, tokens).
    pub sensitive: bool,

    /// Default used when the settings carry no value.
    pub default_value: Option<Value>,

    /// Closed set of accepted values; empty means unrestricted.
    pub allowed_values: Vec<Value>,
}

impl ChannelParameter {
    /// Create an optional parameter.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            required: false,
            sensitive: false,
            default_value: None,
            allowed_values: Vec::new(),
        }
    }

    /// Create a required parameter.
    pub fn required(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            required: true,
            ..Self::new(name, data_type)
        }
    }

    /// Mark the parameter sensitive.
    pub fn with_sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Restrict the parameter to a closed value set.
    pub fn with_allowed_values(mut self, values: Vec<Value>) -> Self {
        self.allowed_values = values;
        self
    }

    /// Validate a supplied value against the declared type and value set.
    pub fn validate_value(&self, value: &Value) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if !self.data_type.matches(value) {
            issues.push(ValidationIssue::error(
                &self.name,
                issue_codes::TYPE_MISMATCH,
                format!("expected {}", self.data_type.name()),
            ));
            return issues;
        }

        if !self.allowed_values.is_empty() && !self.allowed_values.contains(value) {
            issues.push(ValidationIssue::error(
                &self.name,
                issue_codes::VALUE_NOT_ALLOWED,
                format!("value is not one of the {} allowed values", self.allowed_values.len()),
            ));
        }

        issues
    }
}

/// A message property declared by a channel schema.
#[derive(Clone)]
pub struct MessagePropertyConfiguration {
    /// Property name (unique within the schema, case-insensitive).
    pub name: String,

    /// Declared data type.
    pub data_type: DataType,

    /// Whether the property must be present on every message.
    pub required: bool,

    /// Whether the value is sensitive.
    pub sensitive: bool,

    /// Default used when the message carries no value.
    pub default_value: Option<Value>,

    /// Closed set of accepted values; empty means unrestricted.
    pub allowed_values: Vec<Value>,

    /// Minimum string length.
    pub min_length: Option<usize>,

    /// Maximum string length.
    pub max_length: Option<usize>,

    /// Minimum numeric value.
    pub min_value: Option<f64>,

    /// Maximum numeric value.
    pub max_value: Option<f64>,

    /// Pattern a string value must match.
    pub pattern: Option<Regex>,

    /// Custom validator hook, run after the built-in checks.
    pub custom_validator: Option<PropertyValidator>,
}

impl fmt::Debug for MessagePropertyConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessagePropertyConfiguration")
            .field("name", &self.name)
            .field("data_type", &self.data_type)
            .field("required", &self.required)
            .field("sensitive", &self.sensitive)
            .field("default_value", &self.default_value)
            .field("allowed_values", &self.allowed_values)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("min_value", &self.min_value)
            .field("max_value", &self.max_value)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("custom_validator", &self.custom_validator.is_some())
            .finish()
    }
}

impl MessagePropertyConfiguration {
    /// Create an optional property.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            required: false,
            sensitive: false,
            default_value: None,
            allowed_values: Vec::new(),
            min_length: None,
            max_length: None,
            min_value: None,
            max_value: None,
            pattern: None,
            custom_validator: None,
        }
    }

    /// Create a required property.
    pub fn required(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            required: true,
            ..Self::new(name, data_type)
        }
    }

    /// Mark the property sensitive.
    pub fn with_sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Restrict the property to a closed value set.
    pub fn with_allowed_values(mut self, values: Vec<Value>) -> Self {
        self.allowed_values = values;
        self
    }

    /// Constrain string length.
    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    /// Constrain numeric range.
    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    /// Constrain string values to a pattern.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, crate::SchemaError> {
        let compiled = Regex::new(pattern).map_err(|source| crate::SchemaError::InvalidPattern {
            property: self.name.clone(),
            source,
        })?;
        self.pattern = Some(compiled);
        Ok(self)
    }

    /// Attach a custom validator hook.
    pub fn with_validator(
        mut self,
        validator: impl Fn(&Value) -> Vec<ValidationIssue> + Send + Sync + 'static,
    ) -> Self {
        self.custom_validator = Some(Arc::new(validator));
        self
    }

    /// Validate a supplied value against every declared constraint.
    ///
    /// One documented exception to the built-in type check: a property
    /// declared `String` with a custom validator present, whose actual
    /// value is date/time-like (an RFC 3339 or `YYYY-MM-DD` string, or a
    /// number standing for an epoch timestamp), is validator-owned. This
    /// supports fields that accept either an ISO string or a native
    /// timestamp.
    pub fn validate_value(&self, value: &Value) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        let validator_owned = self.data_type == DataType::String
            && self.custom_validator.is_some()
            && is_datetime_like(value);

        if !validator_owned && !self.data_type.matches(value) {
            issues.push(ValidationIssue::error(
                &self.name,
                issue_codes::TYPE_MISMATCH,
                format!("expected {}", self.data_type.name()),
            ));
            return issues;
        }

        if !validator_owned {
            if !self.allowed_values.is_empty() && !self.allowed_values.contains(value) {
                issues.push(ValidationIssue::error(
                    &self.name,
                    issue_codes::VALUE_NOT_ALLOWED,
                    format!(
                        "value is not one of the {} allowed values",
                        self.allowed_values.len()
                    ),
                ));
            }

            if let Some(s) = value.as_str() {
                let len = s.chars().count();
                if self.min_length.is_some_and(|min| len < min)
                    || self.max_length.is_some_and(|max| len > max)
                {
                    issues.push(ValidationIssue::error(
                        &self.name,
                        issue_codes::LENGTH_OUT_OF_RANGE,
                        format!(
                            "length {len} outside [{}, {}]",
                            self.min_length.map_or("0".into(), |v| v.to_string()),
                            self.max_length.map_or("∞".into(), |v| v.to_string()),
                        ),
                    ));
                }

                if let Some(pattern) = &self.pattern {
                    if !pattern.is_match(s) {
                        issues.push(ValidationIssue::error(
                            &self.name,
                            issue_codes::PATTERN_MISMATCH,
                            format!("value does not match pattern {}", pattern.as_str()),
                        ));
                    }
                }
            }

            // Range checks compare every numeric representation as f64, so
            // integers above 2^53 lose precision here. Documented trade-off.
            if let Some(n) = value.as_f64() {
                if self.min_value.is_some_and(|min| n < min)
                    || self.max_value.is_some_and(|max| n > max)
                {
                    issues.push(ValidationIssue::error(
                        &self.name,
                        issue_codes::VALUE_OUT_OF_RANGE,
                        format!(
                            "value {n} outside [{}, {}]",
                            self.min_value.map_or("-∞".into(), |v| v.to_string()),
                            self.max_value.map_or("∞".into(), |v| v.to_string()),
                        ),
                    ));
                }
            }
        }

        if let Some(validator) = &self.custom_validator {
            issues.extend(validator(value));
        }

        issues
    }
}

/// Heuristic for values a date/time-owning custom validator should see
/// instead of the built-in type check.
fn is_datetime_like(value: &Value) -> bool {
    match value {
        Value::String(s) => {
            chrono::DateTime::parse_from_rfc3339(s).is_ok()
                || chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        }
        Value::Number(_) => true,
        _ => false,
    }
}
