#![doc = include_str!("../../../README.md")]

mod assign;
mod decl;
mod enum_type;
mod error;
mod member;
mod value;
mod wire;

pub use crate::{
    decl::{Constructor, EnumDecl, HookScope, LateInit, MemberInit},
    enum_type::{EnumType, Members},
    error::{BuildResult, EnumError, ErrorType},
    member::{Field, Member},
    value::EnumValue,
    wire::MemberWire,
};
