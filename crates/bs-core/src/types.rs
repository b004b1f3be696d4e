//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for raw user input and identifiers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The provided text is not a number.
    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },

    /// The number parsed but is NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    /// The measurement must be strictly positive.
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    /// Body fat percentage outside \[0, 100\].
    #[error("body fat percentage must be between 0 and 100, got {value}")]
    PercentOutOfRange { value: f64 },
}

/// A validated user identifier, used as the persistence key.
///
/// User IDs are opaque non-empty strings handed over by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Creates a new ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::Empty { field: "user ID" });
        }
        Ok(Self(id))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parses a raw text entry into a finite number.
pub fn parse_measurement(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::NotANumber {
            field,
            value: trimmed.to_string(),
        })?;
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field, value });
    }
    Ok(value)
}

/// Parses a raw text entry into a strictly positive number.
pub fn parse_positive(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value = parse_measurement(field, raw)?;
    if value <= 0.0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(value)
}

/// Parses a raw text entry into a body fat percentage in \[0, 100\].
pub fn parse_bf_percent(raw: &str) -> Result<f64, ValidationError> {
    let value = parse_measurement("body fat percentage", raw)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::PercentOutOfRange { value });
    }
    Ok(value)
}
