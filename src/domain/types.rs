//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (non-empty text, canonical part
//! quantities, identifiers issued by the hosted platform) so that once a value
//! reaches the domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Time of day did not match `HH:MM`.
    #[error("invalid time of day: {0}")]
    InvalidTime(String),
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NonEmptyString {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Identifier assigned by the hosted platform.
///
/// The platform returns numeric ids for some tables and uuids for others, so
/// both JSON numbers and strings are accepted and kept in their textual form.
#[derive(Clone, Debug, Serialize, PartialEq, Eq, Hash)]
pub struct RemoteId(String);

impl RemoteId {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = NonEmptyString::new(value)?;
        Ok(Self(value.into_inner()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RemoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for RemoteId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        let raw = match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text,
            Raw::Number(number) => number.to_string(),
        };
        RemoteId::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Server-assigned remito number (`NumeroRemito`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct RemitoNumber(String);

impl RemitoNumber {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = NonEmptyString::new(value)?;
        Ok(Self(value.into_inner()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RemitoNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RemitoNumber {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RemitoNumber> for String {
    fn from(value: RemitoNumber) -> Self {
        value.0
    }
}

/// Normalizes a typed quantity to its canonical decimal form.
///
/// Numeric-looking input (`"2.50"`, `" 3 "`, `"1e1"`) becomes the shortest
/// decimal representation (`"2.5"`, `"3"`, `"10"`); anything else is returned
/// trimmed but otherwise untouched.
pub fn normalize_quantity(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    // `f64::from_str` also accepts "inf"/"nan" spellings; those are not
    // quantities, so only finite values are canonicalized.
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if value == 0.0 {
                "0".to_string()
            } else {
                value.to_string()
            }
        }
        _ => trimmed.to_string(),
    }
}
