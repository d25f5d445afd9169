//! Structured validation error raised by constructors in this crate and
//! by field-level checks in the engine.

use thiserror::Error;

/// A required field is missing or malformed.
///
/// Carries the offending field name so callers can render an actionable
/// message ("select a priority before submitting") rather than a generic
/// failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    /// The field that failed validation (e.g. "origin", "rating").
    pub field: String,
    /// Why the value was rejected.
    pub message: String,
}

impl ValidationError {
    /// Create a validation error for the named field.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_field() {
        let err = ValidationError::new("weight_kg", "must be greater than zero");
        assert_eq!(err.to_string(), "invalid weight_kg: must be greater than zero");
    }
}
