//! Validation issues collected by the schema engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable issue codes surfaced in [`ValidationIssue::code`].
pub mod issue_codes {
    /// A required connection parameter is absent.
    pub const REQUIRED_PARAMETER_MISSING: &str = "REQUIRED_PARAMETER_MISSING";
    /// A required message property is absent.
    pub const REQUIRED_PROPERTY_MISSING: &str = "REQUIRED_PROPERTY_MISSING";
    /// A value does not conform to the declared data type.
    pub const TYPE_MISMATCH: &str = "TYPE_MISMATCH";
    /// A value is outside the declared allowed-value set.
    pub const VALUE_NOT_ALLOWED: &str = "VALUE_NOT_ALLOWED";
    /// A string value violates a length constraint.
    pub const LENGTH_OUT_OF_RANGE: &str = "LENGTH_OUT_OF_RANGE";
    /// A numeric value violates a range constraint.
    pub const VALUE_OUT_OF_RANGE: &str = "VALUE_OUT_OF_RANGE";
    /// A string value does not match the declared pattern.
    pub const PATTERN_MISMATCH: &str = "PATTERN_MISMATCH";
    /// A settings key is not declared by a strict schema.
    pub const UNKNOWN_PARAMETER: &str = "UNKNOWN_PARAMETER";
    /// A message property is not declared by a strict schema.
    pub const UNKNOWN_PROPERTY: &str = "UNKNOWN_PROPERTY";
    /// No configured authentication method is satisfied by the settings.
    pub const AUTHENTICATION_NOT_SATISFIED: &str = "AUTHENTICATION_NOT_SATISFIED";
    /// A message endpoint type is not configured for the channel.
    pub const UNSUPPORTED_ENDPOINT: &str = "UNSUPPORTED_ENDPOINT";
    /// A message content type is not declared by the channel.
    pub const UNSUPPORTED_CONTENT_TYPE: &str = "UNSUPPORTED_CONTENT_TYPE";
    /// An issue produced by a custom property validator.
    pub const CUSTOM: &str = "CUSTOM";
}

/// Severity of a validation issue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    /// The input is invalid.
    #[default]
    Error,

    /// The input is accepted but questionable.
    Warning,
}

/// A single field-level validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// The field (parameter, property, or message part) the issue concerns.
    pub field: String,

    /// Stable machine-readable code (see [`issue_codes`]).
    pub code: String,

    /// Human-readable description.
    pub message: String,

    /// Issue severity.
    #[serde(default)]
    pub severity: ValidationSeverity,
}

impl ValidationIssue {
    /// Create an error-severity issue.
    pub fn error(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
            severity: ValidationSeverity::Error,
        }
    }

    /// Create a warning-severity issue.
    pub fn warning(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
            severity: ValidationSeverity::Warning,
        }
    }

    /// Prefix the field path, e.g. when aggregating batch-entry issues.
    pub fn prefixed(mut self, prefix: &str) -> Self {
        self.field = format!("{prefix}.{}", self.field);
        self
    }

    /// Whether this issue is an error (as opposed to a warning).
    pub fn is_error(&self) -> bool {
        self.severity == ValidationSeverity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.field, self.message)
    }
}
