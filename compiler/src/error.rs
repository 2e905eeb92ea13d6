//! Unified error type for filter compilation
//!
//! Every failure is deterministic and input-dependent: the same filter tree
//! compiled against the same configuration fails the same way every time.

use thiserror::Error;

use crate::filters::FilterRule;
use crate::value::Value;

/// Errors raised while building, decoding or compiling a filter tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Required string on a rule or group is empty
    #[error("{0} must not be empty")]
    EmptyRequired(&'static str),

    /// Group combinator is neither AND nor OR
    #[error("Unsupported group condition: {0}")]
    UnsupportedCondition(String),

    /// No transformer registered for the operator name
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// Value cannot be coerced to the requested type
    #[error("Cannot convert '{value}' to {type_tag}: {cause}")]
    Conversion {
        value: String,
        type_tag: String,
        cause: String,
    },

    /// Operator requires a value but the rule has none
    #[error("Operator {operator} on field {field} requires a value")]
    MissingValue { operator: String, field: String },

    /// Wrong number of values for the operator
    #[error("Operator {operator} on field {field} expects {expected}, got {actual}")]
    InvalidArity {
        operator: String,
        field: String,
        expected: &'static str,
        actual: usize,
    },

    /// Wrong value shape for the operator (e.g. a list where a scalar is required)
    #[error("Operator {operator} on field {field} expects {expected}, got {actual}")]
    InvalidShape {
        operator: String,
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Required per-operator metadata key is missing or invalid
    #[error("Operator {operator}: metadata '{key}' {reason}")]
    Metadata {
        operator: String,
        key: String,
        reason: String,
    },

    /// Filter document could not be decoded
    #[error("Invalid filter document: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;

impl FilterError {
    /// Create a conversion error for a value and target type tag
    pub fn conversion(value: &Value, type_tag: &str, cause: impl Into<String>) -> Self {
        Self::Conversion {
            value: value.to_string(),
            type_tag: type_tag.to_string(),
            cause: cause.into(),
        }
    }

    /// Create a missing value error for a rule
    pub fn missing_value(rule: &FilterRule) -> Self {
        Self::MissingValue {
            operator: rule.operator().to_string(),
            field: rule.field().to_string(),
        }
    }

    /// Create an arity error for a rule
    pub fn invalid_arity(rule: &FilterRule, expected: &'static str, actual: usize) -> Self {
        Self::InvalidArity {
            operator: rule.operator().to_string(),
            field: rule.field().to_string(),
            expected,
            actual,
        }
    }

    /// Create a shape error for a rule whose value has the wrong form
    pub fn invalid_shape(rule: &FilterRule, expected: &'static str, actual: &Value) -> Self {
        Self::InvalidShape {
            operator: rule.operator().to_string(),
            field: rule.field().to_string(),
            expected,
            actual: actual.type_name(),
        }
    }

    /// Create a metadata error for a rule
    pub fn metadata(rule: &FilterRule, key: &str, reason: impl Into<String>) -> Self {
        Self::Metadata {
            operator: rule.operator().to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Error category, stable across messages
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptyRequired(_) | Self::UnsupportedCondition(_) => "structural",
            Self::UnsupportedOperator(_) => "lookup",
            Self::Conversion { .. } => "conversion",
            Self::MissingValue { .. } | Self::InvalidArity { .. } | Self::InvalidShape { .. } => {
                "arity"
            }
            Self::Metadata { .. } => "metadata",
            Self::Decode(_) => "decode",
        }
    }

    /// True for errors caused by the filter tree itself rather than by decoding
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Decode(_))
    }
}
