use dbus_sim_core::signature::Signature;

use super::{Value, VariantType};

#[test]
fn subtype_wildcards() {
    assert!(VariantType::Uint32.is_subtype_of(&VariantType::Any));
    assert!(VariantType::Uint32.is_subtype_of(&VariantType::AnyBasic));
    assert!(!VariantType::array_of(VariantType::Uint32).is_subtype_of(&VariantType::AnyBasic));
    assert!(VariantType::array_of(VariantType::Uint32).is_subtype_of(&VariantType::Any));
}

#[test]
fn subtype_containers_are_covariant() {
    let a = VariantType::array_of(VariantType::Uint32);
    let b = VariantType::array_of(VariantType::Any);
    assert!(a.is_subtype_of(&b));
    assert!(!b.is_subtype_of(&a));
}

#[test]
fn subtype_tuple_requires_matching_arity() {
    let a = VariantType::tuple_of([VariantType::String, VariantType::Uint32]);
    let b = VariantType::tuple_of([VariantType::String]);
    assert!(!a.is_subtype_of(&b));
    assert!(!b.is_subtype_of(&a));
}

#[test]
fn least_general_supertype_agrees_when_equal() {
    let ts = vec![VariantType::Uint32, VariantType::Uint32];
    assert_eq!(
        VariantType::least_general_supertype(ts.iter()),
        VariantType::Uint32
    );
}

#[test]
fn least_general_supertype_basic_mismatch_is_any_basic() {
    let ts = vec![VariantType::Uint32, VariantType::String];
    assert_eq!(
        VariantType::least_general_supertype(ts.iter()),
        VariantType::AnyBasic
    );
}

#[test]
fn least_general_supertype_complex_mismatch_is_any() {
    let ts = vec![
        VariantType::array_of(VariantType::Uint32),
        VariantType::String,
    ];
    assert_eq!(
        VariantType::least_general_supertype(ts.iter()),
        VariantType::Any
    );
}

#[test]
fn signature_round_trip() {
    let sig = Signature::new("a{sv}").unwrap();
    let ty = VariantType::from_signature(sig).unwrap();
    assert_eq!(
        ty,
        VariantType::dict_of(VariantType::String, VariantType::Variant)
    );
    assert_eq!(ty.to_signature().unwrap().as_str(), "a{sv}");
}

#[test]
fn signature_round_trip_nested_struct() {
    let sig = Signature::new("(i(su)ai)").unwrap();
    let ty = VariantType::from_signature(sig).unwrap();
    assert_eq!(ty.to_signature().unwrap().as_str(), "(i(su)ai)");
}

#[test]
fn indefinite_type_has_no_signature() {
    assert!(VariantType::Any.to_signature().is_none());
    assert!(VariantType::array_of(VariantType::AnyBasic)
        .to_signature()
        .is_none());
}

#[test]
fn value_matches_subtype_not_just_equality() {
    let v = Value::Uint32(7);
    assert!(v.matches(&VariantType::Uint32));
    assert!(v.matches(&VariantType::AnyBasic));
    assert!(!v.matches(&VariantType::Int32));
}

#[test]
fn value_equality_is_structural() {
    let a = Value::Array(VariantType::Uint32, vec![Value::Uint32(1), Value::Uint32(2)]);
    let b = Value::Array(VariantType::Uint32, vec![Value::Uint32(1), Value::Uint32(2)]);
    assert_eq!(a, b);
}

#[test]
fn value_ordering_is_total_for_mismatched_kinds() {
    // The checker never lets mismatched kinds reach a comparison, but
    // `Ord` must still be total so `Value` can key a `BTreeMap`.
    let a = Value::Uint32(1);
    let b = Value::String("x".into());
    assert_ne!(a.cmp(&b), std::cmp::Ordering::Equal);
}
