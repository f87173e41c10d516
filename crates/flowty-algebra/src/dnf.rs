//! Disjunctive normal form, spec.md §3.3 and §4.1 (C2).
//!
//! A [`Disjunct`] is a sequence of [`Conjunct`]s; a `Conjunct` is a pair of
//! positive/negative [`Atom`] sequences denoting `(⋂positives) \ (⋃negatives)`.
//! The empty disjunct (zero conjuncts) denotes the empty type; the single
//! conjunct `([], [])` denotes the universal type `Any` (intersection of
//! nothing is the universe, minus the union of nothing, which is empty).
//!
//! Atoms are the non-union, non-nominal, non-intersection, non-difference
//! type terms. Compound constructors (array, reference, record, callable)
//! are atoms for DNF purposes — their *contents* are never distributed
//! through a surrounding union, only referenced via an interned `TypeId`
//! (`Atom::Compound`).

use crate::intern::{TypeId, TypeInterner};
use crate::resolver::{InternalFailure, NominalBodyResolver};
use crate::semantic::SemanticType;
use crate::types::Type;
use flowty_common::{Name, RecursionGuard, RecursionProfile, RecursionResult};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Atom {
    Void,
    Any,
    Null,
    Bool,
    Byte,
    Int,
    /// An array, reference, record or callable type, referenced by its
    /// interned id. DNF never looks inside it; the decision engine and the
    /// extractors do.
    Compound(TypeId),
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Conjunct {
    pub positives: Vec<Atom>,
    pub negatives: Vec<Atom>,
}

impl Conjunct {
    #[must_use]
    pub fn positive(atom: Atom) -> Self {
        Conjunct {
            positives: vec![atom],
            negatives: Vec::new(),
        }
    }

    /// `([], [])`: the identity conjunct for intersection (denotes `Any`).
    #[must_use]
    pub fn universe() -> Self {
        Conjunct::default()
    }

    #[must_use]
    pub fn intersect(&self, other: &Conjunct) -> Conjunct {
        let mut positives = self.positives.clone();
        positives.extend(other.positives.iter().cloned());
        let mut negatives = self.negatives.clone();
        negatives.extend(other.negatives.iter().cloned());
        Conjunct {
            positives,
            negatives,
        }
    }

    /// De Morgan expansion: `¬(P, N)` is a disjunct of `|P|+|N|` conjuncts,
    /// one `([], [p])` per positive and one `([n], [])` per negative.
    #[must_use]
    pub fn negate(&self) -> Disjunct {
        let mut conjuncts = Vec::with_capacity(self.positives.len() + self.negatives.len());
        for p in &self.positives {
            conjuncts.push(Conjunct {
                positives: Vec::new(),
                negatives: vec![p.clone()],
            });
        }
        for n in &self.negatives {
            conjuncts.push(Conjunct {
                positives: vec![n.clone()],
                negatives: Vec::new(),
            });
        }
        Disjunct { conjuncts }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Disjunct {
    pub conjuncts: Vec<Conjunct>,
}

impl Disjunct {
    /// The empty type (`Never`): no conjuncts, nothing inhabits it.
    #[must_use]
    pub fn empty() -> Self {
        Disjunct {
            conjuncts: Vec::new(),
        }
    }

    /// The universal type (`Any`): one conjunct with no constraints.
    #[must_use]
    pub fn universe() -> Self {
        Disjunct {
            conjuncts: vec![Conjunct::universe()],
        }
    }

    #[must_use]
    pub fn single(atom: Atom) -> Self {
        Disjunct {
            conjuncts: vec![Conjunct::positive(atom)],
        }
    }

    #[must_use]
    pub fn union(mut self, other: Disjunct) -> Disjunct {
        self.conjuncts.extend(other.conjuncts);
        self
    }

    #[must_use]
    pub fn intersect(&self, other: &Disjunct) -> Disjunct {
        let mut conjuncts = Vec::with_capacity(self.conjuncts.len() * other.conjuncts.len());
        for c in &self.conjuncts {
            for c2 in &other.conjuncts {
                conjuncts.push(c.intersect(c2));
            }
        }
        Disjunct { conjuncts }
    }

    /// `¬D` = intersection of each conjunct's negation.
    #[must_use]
    pub fn negate(&self) -> Disjunct {
        self.conjuncts
            .iter()
            .map(Conjunct::negate)
            .fold(Disjunct::universe(), |acc, d| acc.intersect(&d))
    }
}

fn check_depth(depth: usize, guard: &RecursionGuard<Name>) -> Result<(), InternalFailure> {
    if depth >= guard.max_depth() {
        return Err(InternalFailure::new(
            "DNF normalization depth exceeded the configured cap",
        ));
    }
    Ok(())
}

/// `toDNF(t: Type) → Disjunct`, spec.md §4.1. Total on well-formed
/// (contractive) types; non-contractive nominal cycles are caught by the
/// recursion guard and reported as an internal failure rather than
/// recursing forever.
pub fn to_dnf(
    ty: &Type,
    interner: &TypeInterner,
    resolver: &dyn NominalBodyResolver,
) -> Result<Disjunct, InternalFailure> {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::TypeEvaluation);
    to_dnf_rec(ty, interner, resolver, &mut guard, 0)
}

fn to_dnf_rec(
    ty: &Type,
    interner: &TypeInterner,
    resolver: &dyn NominalBodyResolver,
    guard: &mut RecursionGuard<Name>,
    depth: usize,
) -> Result<Disjunct, InternalFailure> {
    check_depth(depth, guard)?;
    match ty {
        Type::Void => Ok(Disjunct::single(Atom::Void)),
        Type::Any => Ok(Disjunct::universe()),
        Type::Null => Ok(Disjunct::single(Atom::Null)),
        Type::Bool => Ok(Disjunct::single(Atom::Bool)),
        Type::Byte => Ok(Disjunct::single(Atom::Byte)),
        Type::Int => Ok(Disjunct::single(Atom::Int)),
        Type::Array(_)
        | Type::Reference(..)
        | Type::Record(_)
        | Type::Function(_)
        | Type::Method(_)
        | Type::Property(_) => {
            let id = interner.intern(ty.clone());
            Ok(Disjunct::single(Atom::Compound(id)))
        }
        Type::Nominal(name) => match guard.enter(*name) {
            RecursionResult::Entered => {
                let body = resolver.resolve_nominal_body(*name)?;
                let result = to_dnf_rec(&body, interner, resolver, guard, depth + 1);
                guard.leave();
                result
            }
            RecursionResult::Cycle => Err(InternalFailure::new(format!(
                "non-contractive nominal cycle while expanding nominal type (internal id {name:?})"
            ))),
            RecursionResult::Exhausted => Err(InternalFailure::new(
                "nominal unfolding exceeded the recursion budget",
            )),
        },
        Type::Union(members) => {
            let mut acc = Disjunct::empty();
            for m in members {
                acc = acc.union(to_dnf_rec(m, interner, resolver, guard, depth + 1)?);
            }
            Ok(acc)
        }
        Type::Intersection(members) => {
            let mut acc = Disjunct::universe();
            for m in members {
                acc = acc.intersect(&to_dnf_rec(m, interner, resolver, guard, depth + 1)?);
            }
            Ok(acc)
        }
        Type::Difference(a, b) => {
            let da = to_dnf_rec(a, interner, resolver, guard, depth + 1)?;
            let db = to_dnf_rec(b, interner, resolver, guard, depth + 1)?;
            Ok(da.intersect(&db.negate()))
        }
        Type::Negation(a) => {
            let da = to_dnf_rec(a, interner, resolver, guard, depth + 1)?;
            Ok(da.negate())
        }
    }
}

/// `toDNF` over a semantic type: `Leaf` delegates to the syntactic
/// normalizer, the first-class semantic union/intersection/difference nodes
/// follow the same laws as their syntactic counterparts.
pub fn to_dnf_semantic(
    ty: &SemanticType,
    interner: &TypeInterner,
    resolver: &dyn NominalBodyResolver,
) -> Result<Disjunct, InternalFailure> {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::TypeEvaluation);
    to_dnf_semantic_rec(ty, interner, resolver, &mut guard, 0)
}

fn to_dnf_semantic_rec(
    ty: &SemanticType,
    interner: &TypeInterner,
    resolver: &dyn NominalBodyResolver,
    guard: &mut RecursionGuard<Name>,
    depth: usize,
) -> Result<Disjunct, InternalFailure> {
    check_depth(depth, guard)?;
    match ty {
        SemanticType::Leaf(id) => {
            let inner = interner.lookup(*id);
            to_dnf_rec(&inner, interner, resolver, guard, depth + 1)
        }
        SemanticType::Union(members) => {
            let mut acc = Disjunct::empty();
            for m in members {
                acc = acc.union(to_dnf_semantic_rec(m, interner, resolver, guard, depth + 1)?);
            }
            Ok(acc)
        }
        SemanticType::Intersection(members) => {
            let mut acc = Disjunct::universe();
            for m in members {
                acc = acc.intersect(&to_dnf_semantic_rec(
                    m,
                    interner,
                    resolver,
                    guard,
                    depth + 1,
                )?);
            }
            Ok(acc)
        }
        SemanticType::Difference(a, b) => {
            let da = to_dnf_semantic_rec(a, interner, resolver, guard, depth + 1)?;
            let db = to_dnf_semantic_rec(b, interner, resolver, guard, depth + 1)?;
            Ok(da.intersect(&db.negate()))
        }
    }
}

#[cfg(test)]
#[path = "tests/dnf_tests.rs"]
mod dnf_tests;
