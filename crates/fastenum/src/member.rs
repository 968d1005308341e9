use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, OnceLock},
};

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    error::{BuildResult, EnumError},
    value::EnumValue,
    wire::MemberWire,
};

/// Ordered extra-field storage, keyed by declared field name.
pub(crate) type FieldMap = IndexMap<String, Field, ahash::RandomState>;

/// Custom rendering override installed by a declaration.
pub(crate) type RenderFn = Arc<dyn Fn(&Member, &mut fmt::Formatter<'_>) -> fmt::Result + Send + Sync>;

/// Rendering data shared by a type and all of its members: the type name
/// plus optional `Display`/`Debug` overrides from the declaration.
pub(crate) struct RenderSpec {
    pub type_name: String,
    pub display: Option<RenderFn>,
    pub detail: Option<RenderFn>,
}

/// Value stored in a member's extra field.
///
/// Late hooks may store references to sibling members, so a field holds
/// either a plain scalar or a [`Member`] handle. Cross-member fields can form
/// reference cycles; members are permanent registrations that live for the
/// rest of the process, so the cycles are never collected.
#[derive(Clone)]
pub enum Field {
    /// A plain scalar payload.
    Value(EnumValue),
    /// A sibling member of the same enumeration.
    Member(Member),
}

impl Field {
    /// Returns the scalar payload if this field holds one.
    #[must_use]
    pub fn as_value(&self) -> Option<&EnumValue> {
        match self {
            Self::Value(value) => Some(value),
            Self::Member(_) => None,
        }
    }

    /// Returns the member payload if this field holds one.
    #[must_use]
    pub fn as_member(&self) -> Option<&Member> {
        match self {
            Self::Member(member) => Some(member),
            Self::Value(_) => None,
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Member(member) => write!(f, "{member}"),
        }
    }
}

impl From<EnumValue> for Field {
    fn from(value: EnumValue) -> Self {
        Self::Value(value)
    }
}

impl From<Member> for Field {
    fn from(member: Member) -> Self {
        Self::Member(member)
    }
}

impl From<i64> for Field {
    fn from(value: i64) -> Self {
        Self::Value(EnumValue::Int(value))
    }
}

impl From<i32> for Field {
    fn from(value: i32) -> Self {
        Self::Value(EnumValue::from(value))
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Self::Value(EnumValue::from(value))
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Self::Value(EnumValue::Str(value))
    }
}

impl From<bool> for Field {
    fn from(value: bool) -> Self {
        Self::Value(EnumValue::Bool(value))
    }
}

/// Backing storage for one member singleton.
///
/// Constructor-set fields freeze before the late hook runs so a hook can read
/// sibling fields; hook-set fields freeze per member as each hook returns.
/// Both cells are written exactly once during the registration pass and are
/// lock-free to read afterwards.
pub(crate) struct MemberCell {
    render: Arc<RenderSpec>,
    name: String,
    value: EnumValue,
    fields: OnceLock<FieldMap>,
    late_fields: OnceLock<FieldMap>,
}

/// Handle to one named, value-bearing singleton of an enumeration type.
///
/// Clones share the same cell, so copying a member hands back the same
/// singleton. Equality is cell identity: members of different types compare
/// unequal even when their underlying values coincide. Hashing derives from
/// the underlying value and is stable for the member's lifetime.
#[derive(Clone)]
pub struct Member {
    cell: Arc<MemberCell>,
}

impl Member {
    pub(crate) fn new(render: Arc<RenderSpec>, name: String, value: EnumValue) -> Self {
        Self {
            cell: Arc::new(MemberCell {
                render,
                name,
                value,
                fields: OnceLock::new(),
                late_fields: OnceLock::new(),
            }),
        }
    }

    /// The declared name. For aliased values this is the first name that
    /// claimed the value; aliases do not rename the member.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.cell.name
    }

    /// The underlying value.
    #[must_use]
    pub fn value(&self) -> &EnumValue {
        &self.cell.value
    }

    /// Name of the owning enumeration type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.cell.render.type_name
    }

    /// Reads an extra field set by the constructor or the late hook.
    ///
    /// Declared-but-never-set fields read as `None`. Hook-set fields shadow
    /// constructor-set fields of the same name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.cell
            .late_fields
            .get()
            .and_then(|fields| fields.get(name))
            .or_else(|| self.cell.fields.get().and_then(|fields| fields.get(name)))
    }

    /// Attempts to assign an extra field.
    ///
    /// Members only become visible once their type has sealed, so this always
    /// fails with an immutability violation; fields are set during
    /// construction through [`MemberInit`](crate::MemberInit) and
    /// [`HookScope`](crate::HookScope).
    pub fn set_field(&self, _name: &str, _value: Field) -> BuildResult<()> {
        Err(EnumError::immutable(format_args!("member {self}")))
    }

    /// Attempts to delete an extra field. Always fails, like [`Self::set_field`].
    pub fn del_field(&self, _name: &str) -> BuildResult<()> {
        Err(EnumError::immutable(format_args!("member {self}")))
    }

    /// The member's wire form: owning type name plus underlying value.
    #[must_use]
    pub fn to_wire(&self) -> MemberWire {
        MemberWire {
            type_name: self.cell.render.type_name.clone(),
            value: self.cell.value.clone(),
        }
    }

    pub(crate) fn freeze_fields(&self, fields: FieldMap) {
        // The builder writes this exactly once, after the constructor ran.
        let already = self.cell.fields.set(fields).is_err();
        debug_assert!(!already, "constructor fields frozen twice");
    }

    pub(crate) fn freeze_late_fields(&self, fields: FieldMap) {
        // The builder writes this exactly once, after the member's hook ran.
        let already = self.cell.late_fields.set(fields).is_err();
        debug_assert!(!already, "late fields frozen twice");
    }
}

/// Members are equal only if they are the identical singleton.
impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl Eq for Member {}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cell.value.hash(state);
    }
}

/// `TypeName.MemberName`, unless the declaration overrode the rendering.
impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(display) = &self.cell.render.display {
            return display(self, f);
        }
        write!(f, "{}.{}", self.cell.render.type_name, self.cell.name)
    }
}

/// `<TypeName.MemberName: value>`, unless the declaration overrode the
/// rendering.
impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(detail) = &self.cell.render.detail {
            return detail(self, f);
        }
        write!(f, "<{}.{}: {}>", self.cell.render.type_name, self.cell.name, self.cell.value)
    }
}

/// Serializes as the wire form; deserialize through the owning type's
/// [`DeserializeSeed`](serde::de::DeserializeSeed) implementation to get the
/// singleton back.
impl Serialize for Member {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}
