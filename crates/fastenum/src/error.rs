use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::value::EnumValue;

/// Result type alias for declaration building and registry dispatch.
pub type BuildResult<T> = Result<T, EnumError>;

/// Classification of registry errors.
///
/// Uses strum derives for automatic `Display`, `FromStr`, and
/// `Into<&'static str>` implementations. The string representation matches
/// the variant name exactly (e.g. `LookupFailure` -> "LookupFailure").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize, Deserialize)]
pub enum ErrorType {
    /// Attribute or field mutation attempted on a sealed type or member.
    ImmutabilityViolation,
    /// Retrieval of a value or name that is not registered.
    LookupFailure,
    /// Attempt to extend an enumeration that has already sealed.
    IllegalExtension,
    /// Malformed declaration detected while building a type.
    DeclarationError,
}

/// Error raised by declaration building and registry dispatch.
///
/// Pairs an [`ErrorType`] with a message naming the offending key or
/// operation. These signal programmer errors: they are raised synchronously
/// at the point of violation and there is no retry or recovery path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumError {
    error_type: ErrorType,
    message: String,
}

impl EnumError {
    pub(crate) fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
        }
    }

    /// The error's classification.
    #[must_use]
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// The formatted message, naming the offending key or operation.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn immutable(target: impl fmt::Display) -> Self {
        Self::new(
            ErrorType::ImmutabilityViolation,
            format!("{target} is sealed and prohibits changing any attribute once it is set"),
        )
    }

    pub(crate) fn missing_value(type_name: &str, value: &EnumValue) -> Self {
        Self::new(
            ErrorType::LookupFailure,
            format!("value {value} is not found in the {type_name} declaration"),
        )
    }

    pub(crate) fn missing_name(type_name: &str, name: &str) -> Self {
        Self::new(
            ErrorType::LookupFailure,
            format!("name '{name}' is not found in the {type_name} declaration"),
        )
    }

    pub(crate) fn illegal_extension(base: &str, subtype: &str) -> Self {
        Self::new(
            ErrorType::IllegalExtension,
            format!("{base} is a sealed enumeration and cannot be extended by {subtype}"),
        )
    }

    pub(crate) fn declaration(message: impl fmt::Display) -> Self {
        Self::new(ErrorType::DeclarationError, message.to_string())
    }
}

impl fmt::Display for EnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type, self.message)
    }
}

impl std::error::Error for EnumError {}
