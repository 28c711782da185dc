//! Parse and construction errors for cycle value objects.

use thiserror::Error;

/// Raised when a value read from the API, config or a filter string does
/// not fit the value object it is meant to become.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is empty")]
    EmptyField { field: &'static str },

    #[error("{field} is malformed: {reason}")]
    InvalidFormat { field: &'static str, reason: String },

    #[error("{field} has no variant named '{value}'")]
    UnknownValue { field: &'static str, value: String },
}

impl ValidationError {
    pub fn empty_field(field: &'static str) -> Self {
        ValidationError::EmptyField { field }
    }

    pub fn invalid_format(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field,
            reason: reason.into(),
        }
    }

    /// A closed-set field (status, date bound) received something outside
    /// the set.
    pub fn unknown_value(field: &'static str, value: impl Into<String>) -> Self {
        ValidationError::UnknownValue {
            field,
            value: value.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::UnknownValue { field, .. } => field,
        }
    }
}
