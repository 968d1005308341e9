use std::fmt;

use serde::{Deserialize, Serialize};

/// The underlying value carried by an enumeration member.
///
/// Values key the registry's reverse index, so they must support total
/// equality and hashing; floats are therefore not representable. Tuple-style
/// declarations decompose into a scalar value plus extra constructor
/// arguments, so the value itself is always a scalar.
///
/// # JSON Serialization
///
/// `EnumValue` uses serde's externally tagged variant form
/// (`{"Int": 1}`, `{"Str": "red"}`); lowercase tag aliases are accepted on
/// input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnumValue {
    /// Signed 64-bit integer. Auto-numbered members always land here.
    #[serde(alias = "int")]
    Int(i64),
    /// UTF-8 string value.
    #[serde(alias = "str")]
    Str(String),
    /// Boolean value.
    #[serde(alias = "bool")]
    Bool(bool),
}

impl EnumValue {
    /// Returns the integer payload if this is an `Int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string payload if this is a `Str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the boolean payload if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

/// Values render bare (`1`, `red`, `true`), matching the detailed member
/// form `<Color.RED: red>`.
impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for EnumValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for EnumValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for EnumValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for EnumValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for EnumValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
