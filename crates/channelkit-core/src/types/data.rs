//! Semantic data types for schema parameters and message properties.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Semantic type a parameter or property value must conform to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Boolean flag.
    Boolean,

    /// Whole number.
    Integer,

    /// Any numeric value, integral or floating.
    Number,

    /// UTF-8 string.
    #[default]
    String,
}

impl DataType {
    /// Check whether a JSON value conforms to this type.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            DataType::Boolean => value.is_boolean(),
            DataType::Integer => value.as_i64().is_some() || value.as_u64().is_some(),
            DataType::Number => value.is_number(),
            DataType::String => value.is_string(),
        }
    }

    /// Human-readable name used in validation messages.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Boolean => "boolean",
            DataType::Integer => "integer",
            DataType::Number => "number",
            DataType::String => "string",
        }
    }
}
