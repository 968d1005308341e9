//! Value assignment: the first phase of the registration pass.
//!
//! Every declared name is resolved to a concrete underlying value before any
//! instance is constructed, so alias grouping in the second phase can work
//! over final values only.

use smallvec::SmallVec;

use crate::value::EnumValue;

/// Extra constructor arguments from a tuple-style declaration.
pub(crate) type ExtraArgs = SmallVec<[EnumValue; 2]>;

/// How a single name was declared.
#[derive(Debug, Clone)]
pub(crate) enum MemberSpec {
    /// Name-only forward reference; receives the next counter value.
    Auto,
    /// Explicit scalar value.
    Explicit(EnumValue),
    /// Tuple form: explicit value plus extra constructor arguments.
    Tuple(EnumValue, ExtraArgs),
}

/// One declared name, in source order.
#[derive(Debug, Clone)]
pub(crate) struct MemberDecl {
    pub name: String,
    pub spec: MemberSpec,
}

/// A declared name resolved to its final underlying value.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedMember {
    pub name: String,
    pub value: EnumValue,
    pub extras: ExtraArgs,
}

/// Resolves every declared name to a concrete value, in source order.
///
/// The auto counter starts at 0 when `zero_valued`, else at 1, and advances
/// only when an automatic member consumes it. Explicit values neither reset
/// nor advance the counter, so `[AUTO, ONE = 1, AUTO]` under zero-based
/// numbering resolves to `0, 1, 1` and the second auto aliases `ONE`.
pub(crate) fn resolve_values(members: Vec<MemberDecl>, zero_valued: bool) -> Vec<ResolvedMember> {
    let mut counter = i64::from(!zero_valued);
    members
        .into_iter()
        .map(|decl| {
            let (value, extras) = match decl.spec {
                MemberSpec::Auto => {
                    let value = EnumValue::Int(counter);
                    counter += 1;
                    (value, ExtraArgs::new())
                }
                MemberSpec::Explicit(value) => (value, ExtraArgs::new()),
                MemberSpec::Tuple(value, extras) => (value, extras),
            };
            ResolvedMember {
                name: decl.name,
                value,
                extras,
            }
        })
        .collect()
}
