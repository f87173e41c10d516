use super::*;
use crate::testutil::MapResolver;
use flowty_common::Interner;

#[test]
fn atom_normalizes_to_single_positive_conjunct() {
    let interner = TypeInterner::new();
    let resolver = MapResolver::new();
    let d = to_dnf(&Type::Int, &interner, &resolver).unwrap();
    assert_eq!(d.conjuncts.len(), 1);
    assert_eq!(d.conjuncts[0].positives, vec![Atom::Int]);
    assert!(d.conjuncts[0].negatives.is_empty());
}

#[test]
fn any_normalizes_to_universe() {
    let interner = TypeInterner::new();
    let resolver = MapResolver::new();
    let d = to_dnf(&Type::Any, &interner, &resolver).unwrap();
    assert_eq!(d, Disjunct::universe());
}

#[test]
fn union_concatenates_disjuncts() {
    let interner = TypeInterner::new();
    let resolver = MapResolver::new();
    let d = to_dnf(&Type::union(vec![Type::Int, Type::Bool]), &interner, &resolver).unwrap();
    assert_eq!(d.conjuncts.len(), 2);
}

#[test]
fn intersection_produces_cartesian_conjuncts() {
    let interner = TypeInterner::new();
    let resolver = MapResolver::new();
    let lhs = Type::union(vec![Type::Int, Type::Bool]);
    let rhs = Type::union(vec![Type::Null, Type::Void]);
    let d = to_dnf(&Type::Intersection(vec![lhs, rhs]), &interner, &resolver).unwrap();
    // 2 * 2 = 4 conjuncts, each with 2 positives.
    assert_eq!(d.conjuncts.len(), 4);
    for c in &d.conjuncts {
        assert_eq!(c.positives.len(), 2);
    }
}

#[test]
fn negation_of_atom_is_single_negative_conjunct() {
    let interner = TypeInterner::new();
    let resolver = MapResolver::new();
    let d = to_dnf(&Type::negation(Type::Int), &interner, &resolver).unwrap();
    assert_eq!(d.conjuncts.len(), 1);
    assert!(d.conjuncts[0].positives.is_empty());
    assert_eq!(d.conjuncts[0].negatives, vec![Atom::Int]);
}

#[test]
fn double_negation_round_trips_to_positive() {
    let interner = TypeInterner::new();
    let resolver = MapResolver::new();
    let once = to_dnf(&Type::negation(Type::Int), &interner, &resolver).unwrap();
    let twice = once.negate();
    assert_eq!(twice.conjuncts.len(), 1);
    assert_eq!(twice.conjuncts[0].positives, vec![Atom::Int]);
    assert!(twice.conjuncts[0].negatives.is_empty());
}

#[test]
fn difference_is_intersection_with_negated_rhs() {
    let interner = TypeInterner::new();
    let resolver = MapResolver::new();
    let direct = to_dnf(&Type::difference(Type::Int, Type::Bool), &interner, &resolver).unwrap();
    let manual = to_dnf(&Type::Int, &interner, &resolver)
        .unwrap()
        .intersect(&to_dnf(&Type::Bool, &interner, &resolver).unwrap().negate());
    assert_eq!(direct, manual);
}

#[test]
fn compound_types_are_not_distributed_through_union() {
    let interner = TypeInterner::new();
    let resolver = MapResolver::new();
    let arr = Type::array(Type::union(vec![Type::Int, Type::Bool]));
    let d = to_dnf(&arr, &interner, &resolver).unwrap();
    // The whole array is one atom; its union-typed element is not flattened here.
    assert_eq!(d.conjuncts.len(), 1);
    assert!(matches!(d.conjuncts[0].positives[0], Atom::Compound(_)));
}

#[test]
fn nominal_is_expanded_to_its_body() {
    let interner = TypeInterner::new();
    let names = Interner::new();
    let a = names.intern("A");
    let resolver = MapResolver::new().with(a, Type::union(vec![Type::Int, Type::Null]));
    let d = to_dnf(&Type::Nominal(a), &interner, &resolver).unwrap();
    assert_eq!(d.conjuncts.len(), 2);
}

#[test]
fn recursive_nominal_through_a_constructor_terminates() {
    // type X is null | { X next } — contractive: the cycle passes through a record.
    let interner = TypeInterner::new();
    let names = Interner::new();
    let x = names.intern("X");
    let next = names.intern("next");
    let record = Type::Record(RecordType::new(
        false,
        vec![RecordField {
            name: next,
            ty: Type::Nominal(x),
        }],
    ).unwrap());
    let resolver = MapResolver::new().with(x, Type::union(vec![Type::Null, record]));
    let d = to_dnf(&Type::Nominal(x), &interner, &resolver).unwrap();
    // null | {next: X} normalizes to two conjuncts: Null, and the record atom
    // (whose nested field type is left unexpanded, exactly as compound atoms
    // are not distributed through unions).
    assert_eq!(d.conjuncts.len(), 2);
}

#[test]
fn non_contractive_nominal_is_an_internal_failure() {
    // type X is X — no constructor breaks the cycle.
    let interner = TypeInterner::new();
    let names = Interner::new();
    let x = names.intern("X");
    let resolver = MapResolver::new().with(x, Type::Nominal(x));
    let result = to_dnf(&Type::Nominal(x), &interner, &resolver);
    assert!(result.is_err());
}

#[test]
fn unresolved_nominal_is_an_internal_failure() {
    let interner = TypeInterner::new();
    let names = Interner::new();
    let missing = names.intern("Missing");
    let resolver = MapResolver::new();
    let result = to_dnf(&Type::Nominal(missing), &interner, &resolver);
    assert!(result.is_err());
}
