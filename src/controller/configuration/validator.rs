//! # Field Validators
//!
//! The closed set of per-field validators applied while deriving
//! configuration. A validator either accepts a candidate value, possibly
//! substituting a default, or rejects it with a reason.

use std::fmt;

/// Validation strategy for a single configuration field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Rejects the empty string
    Required,
    /// Substitutes the given value for an empty string, always accepts
    DefaultTo(&'static str),
    /// Accepts only one of the listed values
    OneOf(&'static [&'static str]),
    /// Accepts anything unchanged
    PassThrough,
}

/// Reason a candidate value was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Value is empty.")]
    Empty,
    #[error("Value is not one of '{}'.", .allowed.join(", "))]
    NotOneOf { allowed: &'static [&'static str] },
}

impl Validator {
    /// Validate `value`, returning the value to store
    ///
    /// # Errors
    ///
    /// Returns the rejection reason when the value is not acceptable.
    pub fn validate(self, value: String) -> Result<String, ValidationError> {
        match self {
            Validator::Required if value.is_empty() => Err(ValidationError::Empty),
            Validator::DefaultTo(default) if value.is_empty() => Ok(default.to_string()),
            Validator::OneOf(allowed) if !allowed.contains(&value.as_str()) => {
                Err(ValidationError::NotOneOf { allowed })
            }
            _ => Ok(value),
        }
    }
}

/// A rejected field, recorded by the store for status reporting
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Value '{value}' for key '{key}' is not valid: {reason}")]
pub struct ConfigurationError {
    pub key: String,
    pub value: String,
    pub reason: ValidationError,
}

impl ConfigurationError {
    pub fn new(key: impl fmt::Display, value: String, reason: ValidationError) -> Self {
        Self {
            key: key.to_string(),
            value,
            reason,
        }
    }
}
