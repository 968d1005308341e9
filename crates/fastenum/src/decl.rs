//! The declaration surface: builder, constructor scope, and late-hook scope.
//!
//! `EnumDecl::build` is the registration pass. It runs exactly once per
//! declared enumeration, synchronously and atomically: value assignment,
//! instance construction with alias collapsing, the optional late hook, and
//! sealing. Any failure aborts the whole pass, so no partially built type is
//! ever observable.

use std::{fmt, sync::Arc};

use crate::{
    assign::{self, ExtraArgs, MemberDecl, MemberSpec, ResolvedMember},
    enum_type::{EnumType, NameIndex, ValueIndex},
    error::{BuildResult, EnumError},
    member::{Field, FieldMap, Member, RenderFn, RenderSpec},
    value::EnumValue,
};

/// Member constructor: runs once per distinct value with the resolved value,
/// the extra arguments, and the claimed name in scope. May set declared
/// fields. Inherited by subtypes through ordinary value propagation.
pub type Constructor = Arc<dyn Fn(&mut MemberInit<'_>) -> BuildResult<()> + Send + Sync>;

/// Late hook: runs once per distinct member after every member of the type
/// exists, in declaration order. The sealed type does not retain the hook.
pub type LateInit = Arc<dyn Fn(&mut HookScope<'_>) -> BuildResult<()> + Send + Sync>;

/// A declaration under construction.
///
/// Obtained from [`EnumDecl::new`] for a fresh declaration or from
/// [`EnumType::subtype`] to specialize an unsealed base. Building a
/// declaration with members produces a sealed enumeration; building one
/// without members produces a base type that exists only to be extended.
pub struct EnumDecl {
    type_name: String,
    zero_valued: bool,
    field_names: Vec<String>,
    ctor: Option<Constructor>,
    late_init: Option<LateInit>,
    display: Option<RenderFn>,
    detail: Option<RenderFn>,
    members: Vec<MemberDecl>,
}

impl fmt::Debug for EnumDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumDecl")
            .field("type_name", &self.type_name)
            .field("zero_valued", &self.zero_valued)
            .field("field_names", &self.field_names)
            .field("ctor", &self.ctor.as_ref().map(|_| "<ctor>"))
            .field("late_init", &self.late_init.as_ref().map(|_| "<late_init>"))
            .field("display", &self.display.as_ref().map(|_| "<display>"))
            .field("detail", &self.detail.as_ref().map(|_| "<detail>"))
            .field("members", &self.members)
            .finish()
    }
}

impl EnumDecl {
    /// Starts a fresh declaration with the given type name.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            zero_valued: false,
            field_names: Vec::new(),
            ctor: None,
            late_init: None,
            display: None,
            detail: None,
            members: Vec::new(),
        }
    }

    /// Starts a declaration inheriting a base type's pieces.
    ///
    /// `zero_valued` is deliberately not carried over: the switch is read
    /// from each declaration alone.
    pub(crate) fn inherit(
        type_name: String,
        field_names: Vec<String>,
        ctor: Option<Constructor>,
        late_init: Option<LateInit>,
        display: Option<RenderFn>,
        detail: Option<RenderFn>,
    ) -> Self {
        Self {
            type_name,
            zero_valued: false,
            field_names,
            ctor,
            late_init,
            display,
            detail,
            members: Vec::new(),
        }
    }

    /// Starts auto-numbering at 0 instead of 1.
    #[must_use]
    pub fn zero_valued(mut self) -> Self {
        self.zero_valued = true;
        self
    }

    /// Declares an extra field settable on each member. Redeclaring an
    /// inherited field is a no-op.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.field_names.contains(&name) {
            self.field_names.push(name);
        }
        self
    }

    /// Installs a member constructor, replacing the default that stores only
    /// name and value, and replacing any inherited constructor.
    #[must_use]
    pub fn ctor(mut self, ctor: impl Fn(&mut MemberInit<'_>) -> BuildResult<()> + Send + Sync + 'static) -> Self {
        self.ctor = Some(Arc::new(ctor));
        self
    }

    /// Installs a late hook, replacing any inherited one.
    #[must_use]
    pub fn late_init(mut self, hook: impl Fn(&mut HookScope<'_>) -> BuildResult<()> + Send + Sync + 'static) -> Self {
        self.late_init = Some(Arc::new(hook));
        self
    }

    /// Replaces the default `TypeName.MemberName` rendering.
    #[must_use]
    pub fn display_with(
        mut self,
        render: impl Fn(&Member, &mut fmt::Formatter<'_>) -> fmt::Result + Send + Sync + 'static,
    ) -> Self {
        self.display = Some(Arc::new(render));
        self
    }

    /// Replaces the default `<TypeName.MemberName: value>` rendering.
    #[must_use]
    pub fn detail_with(
        mut self,
        render: impl Fn(&Member, &mut fmt::Formatter<'_>) -> fmt::Result + Send + Sync + 'static,
    ) -> Self {
        self.detail = Some(Arc::new(render));
        self
    }

    /// Declares an auto-numbered member.
    #[must_use]
    pub fn auto(mut self, name: impl Into<String>) -> Self {
        self.members.push(MemberDecl {
            name: name.into(),
            spec: MemberSpec::Auto,
        });
        self
    }

    /// Declares a member with an explicit value.
    #[must_use]
    pub fn member(mut self, name: impl Into<String>, value: impl Into<EnumValue>) -> Self {
        self.members.push(MemberDecl {
            name: name.into(),
            spec: MemberSpec::Explicit(value.into()),
        });
        self
    }

    /// Declares a member with an explicit value plus extra constructor
    /// arguments (the tuple form). If the value turns out to alias an
    /// earlier member, the extra arguments are discarded along with the
    /// construction.
    #[must_use]
    pub fn member_with(
        mut self,
        name: impl Into<String>,
        value: impl Into<EnumValue>,
        extras: impl IntoIterator<Item = EnumValue>,
    ) -> Self {
        self.members.push(MemberDecl {
            name: name.into(),
            spec: MemberSpec::Tuple(value.into(), extras.into_iter().collect()),
        });
        self
    }

    /// Runs the registration pass and returns the finished type.
    ///
    /// With no members declared, the result is an unsealed base type whose
    /// constructor, fields, hooks, and render overrides propagate to
    /// subtypes. With members, the result is sealed: members are singletons,
    /// both indexes are installed, and no further mutation or extension is
    /// possible.
    pub fn build(self) -> BuildResult<EnumType> {
        let Self {
            type_name,
            zero_valued,
            field_names,
            ctor,
            late_init,
            display,
            detail,
            members,
        } = self;

        if type_name.is_empty() {
            return Err(EnumError::declaration("enumeration type name must not be empty"));
        }

        let render = Arc::new(RenderSpec {
            type_name,
            display,
            detail,
        });

        if members.is_empty() {
            return Ok(EnumType::new_base(render, zero_valued, field_names, ctor, late_init));
        }

        let resolved = assign::resolve_values(members, zero_valued);
        let type_name = &render.type_name;

        let mut ordered: Vec<Member> = Vec::with_capacity(resolved.len());
        let mut staged: Vec<FieldMap> = Vec::with_capacity(resolved.len());
        let mut by_value = ValueIndex::default();
        let mut by_name = NameIndex::default();

        for ResolvedMember { name, value, extras } in resolved {
            if name.is_empty() {
                return Err(EnumError::declaration(format!("{type_name} declares a member with an empty name")));
            }
            if by_name.contains_key(&name) {
                return Err(EnumError::declaration(format!(
                    "{type_name} declares the member name {name} twice"
                )));
            }
            if let Some(existing) = by_value.get(&value) {
                // Alias: the value is already claimed, so this name binds to
                // the existing member and no construction runs.
                by_name.insert(name, existing.clone());
                continue;
            }

            let fields = run_ctor(ctor.as_ref(), type_name, &field_names, &name, &value, &extras)?;
            let member = Member::new(Arc::clone(&render), name.clone(), value.clone());
            ordered.push(member.clone());
            staged.push(fields);
            by_value.insert(value, member.clone());
            by_name.insert(name, member);
        }

        // Constructor-set fields freeze before the hook pass so a hook can
        // read any sibling's fields.
        for (member, fields) in ordered.iter().zip(staged) {
            member.freeze_fields(fields);
        }

        for member in &ordered {
            let fields = match &late_init {
                Some(hook) => {
                    let mut scope = HookScope {
                        member,
                        type_name,
                        declared: &field_names,
                        by_value: &by_value,
                        fields: FieldMap::default(),
                    };
                    hook(&mut scope)?;
                    scope.fields
                }
                None => FieldMap::default(),
            };
            member.freeze_late_fields(fields);
        }

        Ok(EnumType::new_sealed(render, zero_valued, field_names, ordered, by_value, by_name))
    }
}

/// Runs the declared constructor, or the default when none is in scope.
///
/// The default stores only name and value and refuses extra arguments.
fn run_ctor(
    ctor: Option<&Constructor>,
    type_name: &str,
    declared: &[String],
    name: &str,
    value: &EnumValue,
    extras: &ExtraArgs,
) -> BuildResult<FieldMap> {
    match ctor {
        Some(ctor) => {
            let mut init = MemberInit {
                type_name,
                declared,
                name,
                value,
                extras,
                fields: FieldMap::default(),
            };
            ctor(&mut init)?;
            Ok(init.fields)
        }
        None => {
            if extras.is_empty() {
                Ok(FieldMap::default())
            } else {
                Err(EnumError::declaration(format!(
                    "{type_name}.{name} passes {} extra constructor arguments but no constructor is in scope",
                    extras.len()
                )))
            }
        }
    }
}

/// Construction scope handed to a constructor for one member.
///
/// Exposes the resolved value, the extra arguments from the tuple form, and
/// the claimed name, and collects writes to declared fields.
pub struct MemberInit<'a> {
    type_name: &'a str,
    declared: &'a [String],
    name: &'a str,
    value: &'a EnumValue,
    extras: &'a ExtraArgs,
    fields: FieldMap,
}

impl MemberInit<'_> {
    /// The name this member is being constructed under.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name
    }

    /// The resolved underlying value.
    #[must_use]
    pub fn value(&self) -> &EnumValue {
        self.value
    }

    /// All extra constructor arguments from the tuple form.
    #[must_use]
    pub fn args(&self) -> &[EnumValue] {
        self.extras
    }

    /// The extra argument at `index`, or a declaration error naming the
    /// shortfall.
    pub fn arg(&self, index: usize) -> BuildResult<&EnumValue> {
        self.extras.get(index).ok_or_else(|| {
            EnumError::declaration(format!(
                "constructor for {}.{} reads argument {index} but the declaration passes {}",
                self.type_name,
                self.name,
                self.extras.len()
            ))
        })
    }

    /// Sets a declared field on the member under construction.
    pub fn set(&mut self, field: &str, value: impl Into<Field>) -> BuildResult<()> {
        set_declared(&mut self.fields, self.type_name, self.declared, field, value.into())
    }
}

/// Scope handed to the late hook for one member, after all members exist.
///
/// Hooks run in declaration order. A hook can read constructor-set fields of
/// any member, late fields of members hooked earlier, and can resolve any
/// sibling by value; writes land on the hook's own member.
pub struct HookScope<'a> {
    member: &'a Member,
    type_name: &'a str,
    declared: &'a [String],
    by_value: &'a ValueIndex,
    fields: FieldMap,
}

impl HookScope<'_> {
    /// The member being hooked.
    #[must_use]
    pub fn member(&self) -> &Member {
        self.member
    }

    /// The member's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.member.name()
    }

    /// The member's underlying value.
    #[must_use]
    pub fn value(&self) -> &EnumValue {
        self.member.value()
    }

    /// Resolves a sibling member by value. All members of the type exist by
    /// the time hooks run, so this covers the whole declaration.
    pub fn get(&self, value: impl Into<EnumValue>) -> BuildResult<Member> {
        let value = value.into();
        self.by_value
            .get(&value)
            .cloned()
            .ok_or_else(|| EnumError::missing_value(self.type_name, &value))
    }

    /// Sets a declared field on the hooked member.
    pub fn set(&mut self, field: &str, value: impl Into<Field>) -> BuildResult<()> {
        set_declared(&mut self.fields, self.type_name, self.declared, field, value.into())
    }
}

fn set_declared(
    fields: &mut FieldMap,
    type_name: &str,
    declared: &[String],
    field: &str,
    value: Field,
) -> BuildResult<()> {
    if !declared.iter().any(|name| name == field) {
        return Err(EnumError::declaration(format!("{type_name} declares no field named {field}")));
    }
    fields.insert(field.to_owned(), value);
    Ok(())
}
