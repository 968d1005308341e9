//! Tests for serialization round trips.
//!
//! A member serializes to its `(type, value)` wire form; deserializing
//! against the live type resolves through retrieval-by-value, so the round
//! trip hands back the identical singleton. JSON goes through the serde seed
//! directly, binary through postcard and the explicit wire struct.

use fastenum::{EnumDecl, EnumType, EnumValue, ErrorType, Member, MemberWire};
use pretty_assertions::assert_eq;
use serde::de::DeserializeSeed;

fn color() -> EnumType {
    EnumDecl::new("Color")
        .member("RED", "red")
        .member("GREEN", "green")
        .member("CRIMSON", "red")
        .build()
        .unwrap()
}

fn json_round_trip(ty: &EnumType, member: &Member) -> Member {
    let json = serde_json::to_string(member).unwrap();
    let mut de = serde_json::Deserializer::from_str(&json);
    ty.deserialize(&mut de).unwrap()
}

// =============================================================================
// 1. JSON round trips
// =============================================================================

/// Every member survives a JSON cycle as the identical singleton.
#[test]
fn json_round_trip_preserves_identity() {
    let color = color();
    for member in &color {
        assert_eq!(json_round_trip(&color, &member), member);
    }
}

/// The wire shape is the type name plus the tagged value.
#[test]
fn json_wire_shape() {
    let color = color();
    let red = color.by_name("RED").unwrap();

    let encoded = serde_json::to_value(&red).unwrap();
    assert_eq!(encoded, serde_json::json!({"type": "Color", "value": {"Str": "red"}}));
}

/// Serializing through an alias handle encodes the canonical member, so the
/// round trip resolves to it.
#[test]
fn alias_round_trips_to_canonical_member() {
    let color = color();
    let crimson = color.by_name("CRIMSON").unwrap();

    let back = json_round_trip(&color, &crimson);
    assert_eq!(back, color.by_name("RED").unwrap());
    assert_eq!(back.name(), "RED");
}

// =============================================================================
// 2. Binary round trips
// =============================================================================

/// Members survive a postcard cycle through the explicit wire struct.
#[test]
fn postcard_round_trip_preserves_identity() {
    let color = color();
    let green = color.by_name("GREEN").unwrap();

    let bytes = postcard::to_allocvec(&green).unwrap();
    let wire: MemberWire = postcard::from_bytes(&bytes).unwrap();
    assert_eq!(color.from_wire(&wire).unwrap(), green);
}

/// The wire struct itself round-trips losslessly.
#[test]
fn postcard_wire_struct_round_trip() {
    let wire = MemberWire {
        type_name: "Color".to_owned(),
        value: EnumValue::from("red"),
    };

    let bytes = postcard::to_allocvec(&wire).unwrap();
    let back: MemberWire = postcard::from_bytes(&bytes).unwrap();
    assert_eq!(back, wire);
}

// =============================================================================
// 3. Wire failures
// =============================================================================

/// A wire form naming a different type is refused.
#[test]
fn wire_type_mismatch_is_refused() {
    let color = color();
    let other = EnumDecl::new("Other").member("RED", "red").build().unwrap();

    let wire = other.by_name("RED").unwrap().to_wire();
    let err = color.from_wire(&wire).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::LookupFailure);
    assert!(err.message().contains("Other"), "got: {err}");
}

/// A wire form carrying an unregistered value fails retrieval-by-value.
#[test]
fn wire_unknown_value_is_refused() {
    let color = color();
    let wire = MemberWire {
        type_name: "Color".to_owned(),
        value: EnumValue::from("blue"),
    };

    let err = color.from_wire(&wire).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::LookupFailure);
    assert!(err.message().contains("blue"), "got: {err}");
}

/// The serde seed surfaces lookup failures as deserialization errors.
#[test]
fn seed_surfaces_lookup_failures() {
    let color = color();
    let json = r#"{"type": "Color", "value": {"Str": "blue"}}"#;

    let mut de = serde_json::Deserializer::from_str(json);
    let err = (&color).deserialize(&mut de).unwrap_err();
    assert!(err.to_string().contains("blue"), "got: {err}");
}
