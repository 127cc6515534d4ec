//! Subtype and coercion lattice properties (§4.7), exercised against
//! `slang::types` directly; the type-judge traversal itself is covered by
//! `judge.rs`'s own `#[cfg(test)]` module.

use slang::types::{is_subtype, make_union, Coercions};
use slang::Type;

#[test]
fn every_type_is_a_subtype_of_itself() {
    for t in [Type::Any, Type::Void, Type::Int, Type::Float, Type::Bool, Type::String, Type::array(Type::Int)] {
        assert!(is_subtype(&t, &t));
    }
}

#[test]
fn union_with_void_is_the_identity() {
    assert_eq!(make_union(Type::Void, Type::Bool), Type::Bool);
    assert_eq!(make_union(Type::Bool, Type::Void), Type::Bool);
}

#[test]
fn union_with_any_is_absorbing() {
    assert_eq!(make_union(Type::Any, Type::String), Type::Any);
    assert_eq!(make_union(Type::String, Type::Any), Type::Any);
}

#[test]
fn a_union_on_the_left_requires_both_arms_to_be_subtypes() {
    let union = Type::Union(Box::new(Type::Int), Box::new(Type::Bool));
    let wider = Type::Union(Box::new(union.clone()), Box::new(Type::String));
    assert!(is_subtype(&union, &wider));
}

#[test]
fn a_union_on_the_right_accepts_any_matching_arm() {
    let union = Type::Union(Box::new(Type::Int), Box::new(Type::String));
    assert!(is_subtype(&Type::Int, &union));
    assert!(is_subtype(&Type::String, &union));
    assert!(!is_subtype(&Type::Bool, &union));
}

#[test]
fn standard_coercions_form_a_bool_int_float_ladder() {
    let table = Coercions::standard();
    assert!(table.can_coerce(&Type::Bool, &Type::Int));
    assert!(table.can_coerce(&Type::Int, &Type::Float));
    assert!(table.can_coerce(&Type::Bool, &Type::Float));
    assert!(!table.can_coerce(&Type::Float, &Type::Bool));
    assert!(!table.can_coerce(&Type::Int, &Type::Bool));
}

#[test]
fn arithmetic_result_widens_to_the_coercible_side() {
    let table = Coercions::standard();
    assert_eq!(table.arithmetic_result(&Type::Int, &Type::Float), Type::Float);
    assert_eq!(table.arithmetic_result(&Type::Bool, &Type::Int), Type::Int);
    assert_eq!(table.arithmetic_result(&Type::Int, &Type::Int), Type::Int);
}
