//! Validation error types

use std::fmt;

/// Input rejected while coercing request data into domain types
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Path or form value has the wrong shape (e.g. a non-integer id)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Form value could not be coerced to a number
    NotANumber { field: &'static str, value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::NotANumber { field, value } => {
                write!(f, "{} must be numeric, got '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::NotANumber {
            field: "fiyat",
            value: "cheap".into(),
        };
        assert_eq!(err.to_string(), "fiyat must be numeric, got 'cheap'");

        let err = ValidationError::InvalidFormat {
            field: "id",
            reason: "expected an integer",
        };
        assert_eq!(err.to_string(), "id: expected an integer");
    }
}
