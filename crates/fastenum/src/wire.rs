//! Wire form for serializing members.
//!
//! A member serializes to its owning type's name plus its underlying value;
//! reconstruction goes through retrieval-by-value on the live type, so a
//! round trip hands back the identical singleton. Deserialization needs the
//! live [`EnumType`] in scope, which it takes as a serde seed instead of
//! consulting any global registry.

use serde::{Deserialize, Serialize, de::DeserializeSeed};

use crate::{enum_type::EnumType, member::Member, value::EnumValue};

/// Serialized form of a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberWire {
    /// Name of the owning enumeration type.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Underlying value of the member.
    pub value: EnumValue,
}

/// Deserializes a member against the live type, preserving identity.
///
/// ```
/// use serde::de::DeserializeSeed;
///
/// let color = fastenum::EnumDecl::new("Color").member("RED", "red").build().unwrap();
/// let red = color.by_name("RED").unwrap();
///
/// let json = serde_json::to_string(&red).unwrap();
/// let mut de = serde_json::Deserializer::from_str(&json);
/// let back = (&color).deserialize(&mut de).unwrap();
/// assert_eq!(back, red);
/// ```
impl<'de> DeserializeSeed<'de> for &EnumType {
    type Value = Member;

    fn deserialize<D>(self, deserializer: D) -> Result<Member, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let wire = MemberWire::deserialize(deserializer)?;
        self.from_wire(&wire).map_err(serde::de::Error::custom)
    }
}
