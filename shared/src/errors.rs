//! Error types for the MacroTrack core

use thiserror::Error;

/// Rejected input to the goal calculator or meal builders
///
/// Raised before any computation runs. The core never substitutes a default
/// for a rejected field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Unknown {field} '{value}'. Must be one of: {expected}")]
    UnknownVariant {
        field: String,
        value: String,
        expected: String,
    },
}

impl InputError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        InputError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn unknown_variant(field: &str, value: &str, expected: &[&str]) -> Self {
        InputError::UnknownVariant {
            field: field.to_string(),
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }

    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            InputError::InvalidInput { field, .. } | InputError::UnknownVariant { field, .. } => {
                field
            }
        }
    }
}

/// Convenience alias for core results
pub type InputResult<T> = Result<T, InputError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = InputError::invalid("weight_kg", "must be greater than 0");
        assert_eq!(err.field(), "weight_kg");
        assert_eq!(err.to_string(), "Invalid weight_kg: must be greater than 0");
    }

    #[test]
    fn test_unknown_variant_lists_expected_values() {
        let err = InputError::unknown_variant("sex", "other", &["male", "female"]);
        assert_eq!(err.field(), "sex");
        assert_eq!(
            err.to_string(),
            "Unknown sex 'other'. Must be one of: male, female"
        );
    }
}
