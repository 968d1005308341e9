//! The registered enumeration type: lookup dispatch, iteration, the
//! mutation lock, and the extension gate.

use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use crate::{
    decl::{Constructor, EnumDecl, LateInit},
    error::{BuildResult, EnumError},
    member::{Member, RenderSpec},
    value::EnumValue,
    wire::MemberWire,
};

/// Reverse index from distinct underlying values to members.
pub(crate) type ValueIndex = IndexMap<EnumValue, Member, ahash::RandomState>;

/// Index from declared names (aliases included) to members.
pub(crate) type NameIndex = IndexMap<String, Member, ahash::RandomState>;

/// Backing storage for a registered type.
///
/// A sealed cell drops its constructor and hook: the hook has already run
/// and the constructor can never run again. An unsealed base cell keeps both
/// for propagation to subtypes and holds no members.
struct TypeCell {
    render: Arc<RenderSpec>,
    zero_valued: bool,
    field_names: Vec<String>,
    members: Vec<Member>,
    by_value: ValueIndex,
    by_name: NameIndex,
    sealed: bool,
    ctor: Option<Constructor>,
    late_init: Option<LateInit>,
}

/// Handle to a registered enumeration type.
///
/// Clones share the same cell. A type built from a declaration with members
/// is sealed: deeply immutable, safe to share across threads without
/// synchronization, and permanent for the rest of the process. A type built
/// from a memberless declaration is an unsealed base that exists only to be
/// specialized through [`Self::subtype`].
#[derive(Clone)]
pub struct EnumType {
    cell: Arc<TypeCell>,
}

impl EnumType {
    pub(crate) fn new_base(
        render: Arc<RenderSpec>,
        zero_valued: bool,
        field_names: Vec<String>,
        ctor: Option<Constructor>,
        late_init: Option<LateInit>,
    ) -> Self {
        Self {
            cell: Arc::new(TypeCell {
                render,
                zero_valued,
                field_names,
                members: Vec::new(),
                by_value: ValueIndex::default(),
                by_name: NameIndex::default(),
                sealed: false,
                ctor,
                late_init,
            }),
        }
    }

    pub(crate) fn new_sealed(
        render: Arc<RenderSpec>,
        zero_valued: bool,
        field_names: Vec<String>,
        members: Vec<Member>,
        by_value: ValueIndex,
        by_name: NameIndex,
    ) -> Self {
        Self {
            cell: Arc::new(TypeCell {
                render,
                zero_valued,
                field_names,
                members,
                by_value,
                by_name,
                sealed: true,
                ctor: None,
                late_init: None,
            }),
        }
    }

    /// The type's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.cell.render.type_name
    }

    /// Whether the registration pass has sealed this type. Base types built
    /// from memberless declarations report false; sealing is irreversible.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.cell.sealed
    }

    /// Whether this declaration opted into zero-based auto-numbering. The
    /// switch is read per declaration and never inherited through
    /// [`Self::subtype`].
    #[must_use]
    pub fn is_zero_valued(&self) -> bool {
        self.cell.zero_valued
    }

    /// Retrieval-by-value: the registry analogue of calling the type with a
    /// raw value. Returns the member whose value equals the argument.
    pub fn get(&self, value: impl Into<EnumValue>) -> BuildResult<Member> {
        let value = value.into();
        self.lookup(&value)
    }

    pub(crate) fn lookup(&self, value: &EnumValue) -> BuildResult<Member> {
        self.cell
            .by_value
            .get(value)
            .cloned()
            .ok_or_else(|| EnumError::missing_value(self.name(), value))
    }

    /// Retrieval-by-name: the registry analogue of indexing the type with a
    /// string. Aliases resolve to the member that first claimed the value.
    pub fn by_name(&self, name: &str) -> BuildResult<Member> {
        self.cell
            .by_name
            .get(name)
            .cloned()
            .ok_or_else(|| EnumError::missing_name(self.name(), name))
    }

    /// Whether a raw value is registered.
    #[must_use]
    pub fn has_value(&self, value: impl Into<EnumValue>) -> bool {
        self.cell.by_value.contains_key(&value.into())
    }

    /// Count of distinct members; aliases do not add to it.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cell.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cell.members.is_empty()
    }

    /// Iterates the distinct members in declaration order. The iterator is
    /// lazy, finite, and restartable by calling `iter` again; aliases
    /// contribute no entries.
    #[must_use]
    pub fn iter(&self) -> Members<'_> {
        Members {
            inner: self.cell.members.iter(),
        }
    }

    /// Every declared name in declaration order, aliases included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cell.by_name.keys().map(String::as_str)
    }

    /// Extra fields declared for this type's members.
    #[must_use]
    pub fn field_names(&self) -> &[String] {
        &self.cell.field_names
    }

    /// Starts a declaration extending this type.
    ///
    /// Allowed only while the type is an unsealed base: the new declaration
    /// inherits the base's fields, constructor, hook, and render overrides by
    /// value. Once a type has sealed, extension fails.
    pub fn subtype(&self, type_name: impl Into<String>) -> BuildResult<EnumDecl> {
        let type_name = type_name.into();
        if self.cell.sealed {
            return Err(EnumError::illegal_extension(self.name(), &type_name));
        }
        Ok(EnumDecl::inherit(
            type_name,
            self.cell.field_names.clone(),
            self.cell.ctor.clone(),
            self.cell.late_init.clone(),
            self.cell.render.display.clone(),
            self.cell.render.detail.clone(),
        ))
    }

    /// Attempts to assign an attribute on the type.
    ///
    /// Sealed types prohibit any attribute change; base types hold no
    /// attribute storage and direct writes to the declaration builder.
    pub fn set_attr(&self, _name: &str, _value: EnumValue) -> BuildResult<()> {
        if self.cell.sealed {
            return Err(EnumError::immutable(format_args!("enumeration {}", self.name())));
        }
        Err(EnumError::declaration(format_args!(
            "{} is a base declaration; declare fields and members through EnumDecl",
            self.name()
        )))
    }

    /// Attempts to delete an attribute on the type. Fails like
    /// [`Self::set_attr`].
    pub fn del_attr(&self, name: &str) -> BuildResult<()> {
        self.set_attr(name, EnumValue::Int(0))
    }

    /// Resolves a wire form back to the singleton it was serialized from.
    ///
    /// The wire's type name must match this type; the value then goes
    /// through retrieval-by-value, so identity is preserved across a
    /// serialize/deserialize cycle.
    pub fn from_wire(&self, wire: &MemberWire) -> BuildResult<Member> {
        if wire.type_name != self.name() {
            return Err(EnumError::new(
                crate::error::ErrorType::LookupFailure,
                format!("wire member belongs to {}, not {}", wire.type_name, self.name()),
            ));
        }
        self.lookup(&wire.value)
    }
}

/// Type handles are equal when they share the same registration.
impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl Eq for EnumType {}

impl fmt::Display for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<enum '{}'>", self.name())
    }
}

impl<'a> IntoIterator for &'a EnumType {
    type Item = Member;
    type IntoIter = Members<'a>;

    fn into_iter(self) -> Members<'a> {
        self.iter()
    }
}

/// Iterator over a type's distinct members in declaration order.
pub struct Members<'a> {
    inner: std::slice::Iter<'a, Member>,
}

impl Iterator for Members<'_> {
    type Item = Member;

    fn next(&mut self) -> Option<Member> {
        self.inner.next().cloned()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Members<'_> {}

impl DoubleEndedIterator for Members<'_> {
    fn next_back(&mut self) -> Option<Member> {
        self.inner.next_back().cloned()
    }
}
