//! Operation results and the standardized error-code catalogue.

use channelkit_core::ValidationIssue;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Stable error codes carried by [`ConnectorError`].
pub mod error_codes {
    pub const ALREADY_INITIALIZED: &str = "ALREADY_INITIALIZED";
    pub const INITIALIZATION_ERROR: &str = "INITIALIZATION_ERROR";
    pub const CONNECTION_TEST_ERROR: &str = "CONNECTION_TEST_ERROR";
    pub const MESSAGE_VALIDATION_FAILED: &str = "MESSAGE_VALIDATION_FAILED";
    pub const SEND_MESSAGE_ERROR: &str = "SEND_MESSAGE_ERROR";
    pub const BATCH_VALIDATION_FAILED: &str = "BATCH_VALIDATION_FAILED";
    pub const SEND_BATCH_ERROR: &str = "SEND_BATCH_ERROR";
    pub const GET_STATUS_ERROR: &str = "GET_STATUS_ERROR";
    pub const GET_MESSAGE_STATUS_ERROR: &str = "GET_MESSAGE_STATUS_ERROR";
    pub const GET_HEALTH_ERROR: &str = "GET_HEALTH_ERROR";
    pub const RECEIVE_STATUS_ERROR: &str = "RECEIVE_STATUS_ERROR";
    pub const RECEIVE_MESSAGES_ERROR: &str = "RECEIVE_MESSAGES_ERROR";
    pub const AUTHENTICATION_FAILED: &str = "AUTHENTICATION_FAILED";
    pub const CAPABILITY_NOT_SUPPORTED: &str = "CAPABILITY_NOT_SUPPORTED";
    pub const INVALID_STATE: &str = "INVALID_STATE";
    pub const CANCELLED: &str = "CANCELLED";
}

/// A standardized operation failure: a stable code, a human-readable
/// message, and the validation issues when the failure came from the
/// validation pipeline.
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct ConnectorError {
    /// One of the [`error_codes`] constants.
    pub code: String,

    /// Human-readable detail.
    pub message: String,

    /// Non-empty only for validation failures.
    pub validation_issues: Vec<ValidationIssue>,
}

impl ConnectorError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            validation_issues: Vec::new(),
        }
    }

    pub fn with_issues(mut self, issues: Vec<ValidationIssue>) -> Self {
        self.validation_issues = issues;
        self
    }
}

/// Outcome of a connector operation.
///
/// Unlike `Result`, both arms carry an open `provider_data` bag so
/// handlers can surface provider-specific detail (raw response ids,
/// rate-limit headers) without widening the typed payload.
#[derive(Debug, Clone)]
pub enum ConnectorResult<T> {
    Success {
        value: T,
        provider_data: HashMap<String, Value>,
    },
    Failure {
        error: ConnectorError,
        provider_data: HashMap<String, Value>,
    },
}

impl<T> ConnectorResult<T> {
    /// A success with no provider data.
    pub fn ok(value: T) -> Self {
        Self::Success {
            value,
            provider_data: HashMap::new(),
        }
    }

    /// A failure with the given code and message.
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::failed(ConnectorError::new(code, message))
    }

    /// A failure carrying validation issues; the message summarizes the
    /// issue count.
    pub fn validation_failure(code: impl Into<String>, issues: Vec<ValidationIssue>) -> Self {
        let message = format!("validation failed with {} issue(s)", issues.len());
        Self::failed(ConnectorError::new(code, message).with_issues(issues))
    }

    /// A failure from an already-built error.
    pub fn failed(error: ConnectorError) -> Self {
        Self::Failure {
            error,
            provider_data: HashMap::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The success value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success { value, .. } => Some(value),
            Self::Failure { .. } => None,
        }
    }

    /// Consume the result, yielding the success value.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Success { value, .. } => Some(value),
            Self::Failure { .. } => None,
        }
    }

    /// The failure, if any.
    pub fn error(&self) -> Option<&ConnectorError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// The failure code, if any.
    pub fn error_code(&self) -> Option<&str> {
        self.error().map(|e| e.code.as_str())
    }

    /// The provider data bag of either arm.
    pub fn provider_data(&self) -> &HashMap<String, Value> {
        match self {
            Self::Success { provider_data, .. } | Self::Failure { provider_data, .. } => {
                provider_data
            }
        }
    }

    /// Attach one provider-data entry.
    pub fn with_provider_data(mut self, key: impl Into<String>, value: Value) -> Self {
        match &mut self {
            Self::Success { provider_data, .. } | Self::Failure { provider_data, .. } => {
                provider_data.insert(key.into(), value);
            }
        }
        self
    }

    /// Map the success value, leaving failures untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ConnectorResult<U> {
        match self {
            Self::Success {
                value,
                provider_data,
            } => ConnectorResult::Success {
                value: f(value),
                provider_data,
            },
            Self::Failure {
                error,
                provider_data,
            } => ConnectorResult::Failure {
                error,
                provider_data,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use channelkit_core::issue_codes;
    use serde_json::json;

    #[test]
    fn test_success_accessors() {
        let result = ConnectorResult::ok(42);
        assert!(result.is_success());
        assert_eq!(result.value(), Some(&42));
        assert!(result.error().is_none());
    }

    #[test]
    fn test_failure_accessors() {
        let result: ConnectorResult<()> =
            ConnectorResult::failure(error_codes::SEND_MESSAGE_ERROR, "boom");
        assert!(!result.is_success());
        assert_eq!(result.error_code(), Some(error_codes::SEND_MESSAGE_ERROR));
        assert!(result.into_value().is_none());
    }

    #[test]
    fn test_validation_failure_carries_issues() {
        let issues = vec![ValidationIssue::error(
            "To",
            issue_codes::REQUIRED_PROPERTY_MISSING,
            "missing",
        )];
        let result: ConnectorResult<()> =
            ConnectorResult::validation_failure(error_codes::MESSAGE_VALIDATION_FAILED, issues);
        let error = result.error().unwrap();
        assert_eq!(error.validation_issues.len(), 1);
        assert!(error.message.contains("1 issue"));
    }

    #[test]
    fn test_provider_data_attachment() {
        let result = ConnectorResult::ok(1).with_provider_data("request_id", json!("r-1"));
        assert_eq!(result.provider_data().get("request_id"), Some(&json!("r-1")));
    }

    #[test]
    fn test_map_preserves_failure() {
        let result: ConnectorResult<i32> = ConnectorResult::failure(error_codes::CANCELLED, "c");
        let mapped = result.map(|v| v * 2);
        assert_eq!(mapped.error_code(), Some(error_codes::CANCELLED));
    }
}
