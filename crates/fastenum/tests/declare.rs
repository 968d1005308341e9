//! Tests for value assignment and alias resolution across declaration forms.
//!
//! These cover the first two phases of the registration pass: auto-numbering
//! (0- and 1-based, mixed with explicit values) and alias collapsing (two
//! names sharing one value resolve to one singleton).

use fastenum::{EnumDecl, EnumValue, ErrorType, Member};
use pretty_assertions::assert_eq;

// =============================================================================
// 1. Value-provided declarations
// =============================================================================

/// Explicit values register one singleton per distinct value; a repeated
/// value becomes an alias of the first name that claimed it.
#[test]
fn value_provided_enum_with_alias() {
    let std_enum = EnumDecl::new("StdEnum")
        .member("ONE", 1)
        .member("TWO", 2)
        .member("THREE", 3)
        .member("ALIAS_THREE", 3)
        .build()
        .unwrap();

    let one = std_enum.by_name("ONE").unwrap();
    let two = std_enum.by_name("TWO").unwrap();
    let three = std_enum.by_name("THREE").unwrap();
    let alias = std_enum.by_name("ALIAS_THREE").unwrap();

    assert_eq!(one.value(), &EnumValue::Int(1));
    assert_eq!(two.value(), &EnumValue::Int(2));
    assert_eq!(three.value(), &EnumValue::Int(3));

    // The alias is the same singleton, under the first name.
    assert_eq!(alias, three);
    assert_eq!(alias.name(), "THREE");
    assert_eq!(alias.value(), &EnumValue::Int(3));

    assert_eq!(std_enum.get(1).unwrap(), one);
    assert_eq!(std_enum.get(2).unwrap(), two);
    assert_eq!(std_enum.get(3).unwrap(), three);
}

/// Iteration skips aliases: three distinct values out of four names.
#[test]
fn alias_does_not_show_up_in_iteration() {
    let std_enum = EnumDecl::new("StdEnum")
        .member("ONE", 1)
        .member("TWO", 2)
        .member("THREE", 3)
        .member("ALIAS_THREE", 3)
        .build()
        .unwrap();

    assert_eq!(std_enum.len(), 3);
    let members: Vec<Member> = std_enum.iter().collect();
    assert_eq!(members, vec![
        std_enum.by_name("ONE").unwrap(),
        std_enum.by_name("TWO").unwrap(),
        std_enum.by_name("THREE").unwrap(),
    ]);

    // All four declared names are still addressable.
    let names: Vec<&str> = std_enum.names().collect();
    assert_eq!(names, vec!["ONE", "TWO", "THREE", "ALIAS_THREE"]);
}

// =============================================================================
// 2. Lightweight (auto-valued) declarations
// =============================================================================

/// Auto-numbering is 1-based unless the declaration opts into zero-based.
#[test]
fn lightweight_is_one_based_by_default() {
    let light = EnumDecl::new("LightEnum")
        .auto("ONE")
        .auto("TWO")
        .auto("THREE")
        .build()
        .unwrap();

    let values: Vec<i64> = light.iter().filter_map(|m| m.value().as_int()).collect();
    assert_eq!(values, vec![1, 2, 3]);
    assert!(!light.is_zero_valued());
}

/// The zero-valued switch moves the counter base to 0.
#[test]
fn lightweight_zero_based_on_request() {
    let light = EnumDecl::new("LightEnumZero")
        .zero_valued()
        .auto("ZERO")
        .auto("ONE")
        .auto("TWO")
        .build()
        .unwrap();

    let values: Vec<i64> = light.iter().filter_map(|m| m.value().as_int()).collect();
    assert_eq!(values, vec![0, 1, 2]);
    assert!(light.is_zero_valued());
}

// =============================================================================
// 3. Mixed auto and explicit declarations
// =============================================================================

/// Explicit values never advance the auto counter, so an auto member can
/// collide with an earlier explicit one and become its alias.
#[test]
fn mixed_auto_collides_into_alias() {
    let mixed = EnumDecl::new("MixedEnum")
        .zero_valued()
        .auto("AUTO_ZERO")
        .member("ONE", 1)
        .auto("AUTO_ONE")
        .member("TWO", 2)
        .build()
        .unwrap();

    assert_eq!(mixed.by_name("AUTO_ZERO").unwrap().value(), &EnumValue::Int(0));
    assert_eq!(mixed.by_name("ONE").unwrap().value(), &EnumValue::Int(1));
    assert_eq!(mixed.by_name("AUTO_ONE").unwrap().value(), &EnumValue::Int(1));
    assert_eq!(mixed.by_name("TWO").unwrap().value(), &EnumValue::Int(2));

    assert_eq!(mixed.by_name("AUTO_ONE").unwrap(), mixed.by_name("ONE").unwrap());
    assert_eq!(mixed.len(), 3);
}

/// Declaration order of explicit and auto members does not change how the
/// counter advances: autos take 0, 1, ... regardless of what surrounds them.
#[test]
fn mixed_counter_ignores_explicit_positions() {
    let mixed = EnumDecl::new("MixedEnum")
        .zero_valued()
        .member("ONE", 1)
        .auto("AUTO_ZERO")
        .member("TWO", 2)
        .auto("AUTO_ONE")
        .build()
        .unwrap();

    assert_eq!(mixed.by_name("AUTO_ZERO").unwrap().value(), &EnumValue::Int(0));
    assert_eq!(mixed.by_name("AUTO_ONE").unwrap().value(), &EnumValue::Int(1));
    assert_eq!(mixed.by_name("AUTO_ONE").unwrap(), mixed.by_name("ONE").unwrap());
}

// =============================================================================
// 4. Declaration order and string values
// =============================================================================

/// Iteration yields distinct members in source declaration order even when
/// values are unordered.
#[test]
fn iteration_preserves_declaration_order() {
    let scattered = EnumDecl::new("Scattered")
        .member("ELEVEN", 11)
        .member("FOUR", 4)
        .member("ONE", 1)
        .build()
        .unwrap();

    let names: Vec<String> = scattered.iter().map(|m| m.name().to_owned()).collect();
    assert_eq!(names, vec!["ELEVEN", "FOUR", "ONE"]);

    // Restarting produces the same sequence.
    let again: Vec<String> = scattered.iter().map(|m| m.name().to_owned()).collect();
    assert_eq!(names, again);
}

/// String-valued members participate in lookup and aliasing like integers.
#[test]
fn string_valued_members() {
    let color = EnumDecl::new("Color")
        .member("RED", "red")
        .member("GREEN", "green")
        .member("CRIMSON", "red")
        .build()
        .unwrap();

    let red = color.by_name("RED").unwrap();
    assert_eq!(color.get("red").unwrap(), red);
    assert_eq!(color.by_name("CRIMSON").unwrap(), red);
    assert_eq!(color.len(), 2);
}

// =============================================================================
// 5. Malformed declarations
// =============================================================================

/// The same name declared twice is a declaration error, not a silent
/// override.
#[test]
fn duplicate_member_name_is_rejected() {
    let err = EnumDecl::new("Dup")
        .member("ONE", 1)
        .member("ONE", 2)
        .build()
        .unwrap_err();

    assert_eq!(err.error_type(), ErrorType::DeclarationError);
    assert!(err.message().contains("ONE"), "message should name the duplicate: {err}");
}

/// An empty type name is rejected before any member work happens.
#[test]
fn empty_type_name_is_rejected() {
    let err = EnumDecl::new("").auto("ONE").build().unwrap_err();
    assert_eq!(err.error_type(), ErrorType::DeclarationError);
}
