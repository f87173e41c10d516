//! Emptiness, spec.md §4.2 (C3).
//!
//! `is_empty` normalizes to DNF and proves each conjunct empty or not.
//! A conjunct `(P, N)` is empty iff the intersection of `P` is empty, or
//! some member of `N` already contains that intersection. Atom-kind
//! disagreement (e.g. `Int` and `Bool` both positive) is the cheap case;
//! same-kind compound positives (two `Array`s, two `Record`s, ...) combine
//! structurally instead of recursing through the general subtype machinery,
//! which would loop back on itself (`Array(x) \ Array(y)` containment is
//! decided by comparing `x` and `y` directly, not by re-normalizing the
//! whole array difference).

use flowty_algebra::{Atom, Conjunct, InternalFailure, NominalBodyResolver, Type, TypeInterner};
use flowty_common::CoreOptions;

use crate::lifetime::LifetimeRelation;

/// Bundles the collaborators every decision-engine query needs, so call
/// sites don't thread four parameters through every function.
pub struct Engine<'a> {
    pub interner: &'a TypeInterner,
    pub resolver: &'a dyn NominalBodyResolver,
    pub lifetimes: &'a dyn LifetimeRelation,
    pub options: &'a CoreOptions,
}

impl<'a> Engine<'a> {
    #[must_use]
    pub fn new(
        interner: &'a TypeInterner,
        resolver: &'a dyn NominalBodyResolver,
        lifetimes: &'a dyn LifetimeRelation,
        options: &'a CoreOptions,
    ) -> Self {
        Engine {
            interner,
            resolver,
            lifetimes,
            options,
        }
    }

    /// `isEmpty(t) → bool`, spec.md §4.2.
    pub fn is_empty(&self, ty: &Type) -> Result<bool, InternalFailure> {
        let dnf = flowty_algebra::to_dnf(ty, self.interner, self.resolver)?;
        for conjunct in &dnf.conjuncts {
            if !self.conjunct_is_empty(conjunct)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub(crate) fn conjunct_is_empty(&self, conjunct: &Conjunct) -> Result<bool, InternalFailure> {
        let Some(positive) = self.combine_positives(&conjunct.positives)? else {
            // Disjoint/incompatible positive atoms: the intersection is empty
            // regardless of the negatives.
            return Ok(true);
        };
        if self.representative_is_empty(&positive)? {
            return Ok(true);
        }
        for negative in &conjunct.negatives {
            let negative_ty = self.atom_to_type(negative);
            if self.contains(&negative_ty, &positive)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Folds the positive atoms of a conjunct into a single `Type`
    /// representing their intersection, or `None` if two atoms are
    /// provably disjoint by kind (no recursive check needed).
    fn combine_positives(&self, positives: &[Atom]) -> Result<Option<Type>, InternalFailure> {
        let mut acc: Option<Type> = None;
        for atom in positives {
            if matches!(atom, Atom::Any) {
                continue;
            }
            acc = match acc {
                None => Some(self.atom_to_type(atom)),
                Some(prev) => match self.combine_two(&prev, atom)? {
                    Some(next) => Some(next),
                    None => return Ok(None),
                },
            };
        }
        Ok(Some(acc.unwrap_or(Type::Any)))
    }

    fn atom_to_type(&self, atom: &Atom) -> Type {
        match atom {
            Atom::Void => Type::Void,
            Atom::Any => Type::Any,
            Atom::Null => Type::Null,
            Atom::Bool => Type::Bool,
            Atom::Byte => Type::Byte,
            Atom::Int => Type::Int,
            Atom::Compound(id) => (*self.interner.lookup(*id)).clone(),
        }
    }

    /// Combines an already-accumulated representative type with one more
    /// positive atom. `None` means the two are disjoint by kind.
    fn combine_two(&self, acc: &Type, atom: &Atom) -> Result<Option<Type>, InternalFailure> {
        let atom_ty = self.atom_to_type(atom);
        match (acc, &atom_ty) {
            (Type::Any, other) => Ok(Some(other.clone())),
            (_, Type::Any) => Ok(Some(acc.clone())),
            (Type::Array(a), Type::Array(b)) => Ok(Some(Type::array(Type::intersection(vec![
                (**a).clone(),
                (**b).clone(),
            ])))),
            (Type::Reference(a, la), Type::Reference(b, lb)) => {
                if !self.element_equivalent(a, b)? {
                    return Ok(None);
                }
                if !self.lifetime_within(*la, *lb) && !self.lifetime_within(*lb, *la) {
                    // Neither lifetime nests the other: the two references
                    // can't share a value, so the intersection is empty.
                    return Ok(None);
                }
                let lifetime = self.narrower_lifetime(*la, *lb);
                Ok(Some(Type::reference((**a).clone(), lifetime)))
            }
            (Type::Record(a), Type::Record(b)) => self.combine_records(a, b),
            (Type::Function(a), Type::Function(b)) => {
                Ok(Self::callable_shapes_agree(&a.params, &a.returns, &b.params, &b.returns)
                    .then(|| acc.clone()))
            }
            (Type::Property(a), Type::Property(b)) => {
                Ok(Self::callable_shapes_agree(&a.params, &a.returns, &b.params, &b.returns)
                    .then(|| acc.clone()))
            }
            (Type::Method(a), Type::Method(b)) => {
                Ok(Self::callable_shapes_agree(&a.params, &a.returns, &b.params, &b.returns)
                    .then(|| acc.clone()))
            }
            (x, y) if x == y => Ok(Some(acc.clone())),
            _ => Ok(None),
        }
    }

    fn callable_shapes_agree(
        ap: &[Type],
        ar: &[Type],
        bp: &[Type],
        br: &[Type],
    ) -> bool {
        ap.len() == bp.len() && ar.len() == br.len()
    }

    /// Reference element invariance: `a` and `b` are the same element type up
    /// to mutual subtyping.
    fn element_equivalent(&self, a: &Type, b: &Type) -> Result<bool, InternalFailure> {
        if a == b {
            return Ok(true);
        }
        Ok(self.is_subtype(a, b)? && self.is_subtype(b, a)?)
    }

    /// `isWithin(inner, outer)` lifted over the optional lifetime a
    /// `Reference` carries, spec.md §4.2's "Lifetimes": a missing lifetime
    /// denotes the implicit enclosing lifetime `this`, which is within
    /// every declared lifetime of an enclosing scope but contains nothing
    /// declared itself.
    fn lifetime_within(&self, inner: Option<flowty_common::Name>, outer: Option<flowty_common::Name>) -> bool {
        match (inner, outer) {
            (Some(i), Some(o)) => self.lifetimes.is_within(i, o),
            (None, None) => true,
            (None, Some(_)) => true,
            (Some(_), None) => false,
        }
    }

    fn narrower_lifetime(
        &self,
        a: Option<flowty_common::Name>,
        b: Option<flowty_common::Name>,
    ) -> Option<flowty_common::Name> {
        match (a, b) {
            (Some(x), Some(y)) if x == y => Some(x),
            (Some(x), Some(y)) if self.lifetimes.is_within(x, y) => Some(x),
            (Some(x), Some(y)) if self.lifetimes.is_within(y, x) => Some(y),
            (Some(x), _) => Some(x),
            (None, other) => other,
        }
    }

    fn combine_records(
        &self,
        a: &flowty_algebra::RecordType,
        b: &flowty_algebra::RecordType,
    ) -> Result<Option<Type>, InternalFailure> {
        let mut fields = Vec::new();
        for field in &a.fields {
            match b.field(field.name) {
                Some(other_ty) => fields.push(flowty_algebra::RecordField {
                    name: field.name,
                    ty: Type::intersection(vec![field.ty.clone(), other_ty.clone()]),
                }),
                None if b.open => fields.push(field.clone()),
                // `b` is closed and lacks a field `a` requires.
                None => return Ok(None),
            }
        }
        for field in &b.fields {
            if a.field(field.name).is_none() {
                if a.open {
                    fields.push(field.clone());
                } else {
                    return Ok(None);
                }
            }
        }
        match flowty_algebra::RecordType::new(a.open && b.open, fields) {
            Ok(rt) => Ok(Some(Type::Record(rt))),
            Err(_) => Ok(None),
        }
    }

    /// Whether a combined representative type (the result of `combine_positives`)
    /// is itself empty. Compound shapes are inhabited by construction unless a
    /// nested element/field is empty; primitives other than `Void` never are.
    fn representative_is_empty(&self, ty: &Type) -> Result<bool, InternalFailure> {
        match ty {
            Type::Void => Ok(true),
            Type::Any | Type::Null | Type::Bool | Type::Byte | Type::Int => Ok(false),
            Type::Array(elem) => {
                if self.options.empty_array_inhabits_every_array {
                    Ok(false)
                } else {
                    self.is_empty(elem)
                }
            }
            Type::Reference(..) => Ok(false),
            Type::Record(r) => {
                for field in &r.fields {
                    if self.is_empty(&field.ty)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Type::Function(_) | Type::Method(_) | Type::Property(_) => Ok(false),
            Type::Nominal(_) | Type::Union(_) | Type::Intersection(_) | Type::Difference(..) | Type::Negation(_) => {
                self.is_empty(ty)
            }
        }
    }

    /// Does `negative` (a single atom's type) contain `positive` (the
    /// combined representative)? Decided structurally per kind rather than
    /// by recursing through `is_subtype` on the same compound shape, which
    /// would recreate the call we're already answering.
    fn contains(&self, negative: &Type, positive: &Type) -> Result<bool, InternalFailure> {
        match (positive, negative) {
            (_, Type::Any) => Ok(true),
            (Type::Array(p), Type::Array(n)) => self.is_empty(&Type::difference((**p).clone(), (**n).clone())),
            (Type::Reference(p, lp), Type::Reference(n, ln)) => {
                Ok(self.element_equivalent(p, n)? && self.lifetime_within(*lp, *ln))
            }
            (Type::Record(p), Type::Record(n)) => self.record_contains(p, n),
            (Type::Function(p), Type::Function(n))
            | (Type::Property(p), Type::Property(n)) => {
                Ok(Self::callable_shapes_agree(&p.params, &p.returns, &n.params, &n.returns))
            }
            (Type::Method(p), Type::Method(n)) => {
                Ok(Self::callable_shapes_agree(&p.params, &p.returns, &n.params, &n.returns))
            }
            (a, b) if a == b => Ok(true),
            _ => Ok(false),
        }
    }

    /// A negative record `n` contains positive record `p` iff every field
    /// `n` requires is present on `p` and subsumed by it, and `n` being
    /// closed forbids `p` from being strictly wider.
    fn record_contains(
        &self,
        p: &flowty_algebra::RecordType,
        n: &flowty_algebra::RecordType,
    ) -> Result<bool, InternalFailure> {
        for field in &n.fields {
            match p.field(field.name) {
                Some(p_ty) => {
                    if !self.is_subtype(&field.ty, p_ty)? {
                        return Ok(false);
                    }
                }
                None => return Ok(false),
            }
        }
        if !n.open && p.fields.len() != n.fields.len() {
            return Ok(false);
        }
        Ok(true)
    }

    /// `isSubtype(lhs, rhs) ≡ isEmpty(rhs \ lhs)`, spec.md §4.2.
    pub fn is_subtype(&self, lhs: &Type, rhs: &Type) -> Result<bool, InternalFailure> {
        self.is_empty(&Type::difference(rhs.clone(), lhs.clone()))
    }

    /// `isContractive(name, body)`: every recursive reference to `name`
    /// inside `body` must pass through at least one constructor.
    pub fn is_contractive(&self, name: flowty_common::Name, body: &Type) -> bool {
        is_contractive_rec(name, body, false)
    }
}

fn is_contractive_rec(name: flowty_common::Name, ty: &Type, guarded: bool) -> bool {
    match ty {
        Type::Nominal(n) if *n == name => guarded,
        Type::Nominal(_) => true,
        Type::Array(e) => is_contractive_rec(name, e, true),
        Type::Reference(e, _) => is_contractive_rec(name, e, true),
        Type::Record(r) => r.fields.iter().all(|f| is_contractive_rec(name, &f.ty, true)),
        Type::Function(sig) | Type::Property(sig) => sig
            .params
            .iter()
            .chain(sig.returns.iter())
            .all(|t| is_contractive_rec(name, t, true)),
        Type::Method(sig) => sig
            .params
            .iter()
            .chain(sig.returns.iter())
            .all(|t| is_contractive_rec(name, t, true)),
        Type::Union(members) | Type::Intersection(members) => {
            members.iter().all(|m| is_contractive_rec(name, m, guarded))
        }
        Type::Difference(a, b) => {
            is_contractive_rec(name, a, guarded) && is_contractive_rec(name, b, guarded)
        }
        Type::Negation(a) => is_contractive_rec(name, a, guarded),
        Type::Void | Type::Any | Type::Null | Type::Bool | Type::Byte | Type::Int => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifetime::StaticLifetimeRelation;
    use flowty_algebra::testutil::MapResolver;
    use flowty_common::Interner;

    fn engine<'a>(
        interner: &'a TypeInterner,
        resolver: &'a MapResolver,
        lifetimes: &'a StaticLifetimeRelation,
        options: &'a CoreOptions,
    ) -> Engine<'a> {
        Engine::new(interner, resolver, lifetimes, options)
    }

    #[test]
    fn disjoint_atoms_intersect_to_empty() {
        let interner = TypeInterner::new();
        let resolver = MapResolver::new();
        let names = Interner::new();
        let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
        let options = CoreOptions::default();
        let e = engine(&interner, &resolver, &lifetimes, &options);
        let ty = Type::Intersection(vec![Type::Int, Type::Bool]);
        assert!(e.is_empty(&ty).unwrap());
    }

    #[test]
    fn void_is_empty_and_any_is_not() {
        let interner = TypeInterner::new();
        let resolver = MapResolver::new();
        let names = Interner::new();
        let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
        let options = CoreOptions::default();
        let e = engine(&interner, &resolver, &lifetimes, &options);
        assert!(e.is_empty(&Type::Void).unwrap());
        assert!(!e.is_empty(&Type::Any).unwrap());
    }

    #[test]
    fn plain_array_is_never_empty_on_its_own() {
        let interner = TypeInterner::new();
        let resolver = MapResolver::new();
        let names = Interner::new();
        let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
        let options = CoreOptions::default();
        let e = engine(&interner, &resolver, &lifetimes, &options);
        assert!(!e.is_empty(&Type::array(Type::Int)).unwrap());
    }

    #[test]
    fn array_of_disjoint_elements_is_empty_unless_zero_length_admitted() {
        let interner = TypeInterner::new();
        let resolver = MapResolver::new();
        let names = Interner::new();
        let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
        let ty = Type::Intersection(vec![Type::array(Type::Int), Type::array(Type::Bool)]);

        let mut admits = CoreOptions::default();
        admits.empty_array_inhabits_every_array = true;
        let e = engine(&interner, &resolver, &lifetimes, &admits);
        assert!(!e.is_empty(&ty).unwrap());

        let mut strict = CoreOptions::default();
        strict.empty_array_inhabits_every_array = false;
        let e2 = engine(&interner, &resolver, &lifetimes, &strict);
        assert!(e2.is_empty(&ty).unwrap());
    }

    #[test]
    fn record_with_disagreeing_closed_fields_is_empty() {
        let interner = TypeInterner::new();
        let resolver = MapResolver::new();
        let names = Interner::new();
        let f = names.intern("f");
        let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
        let options = CoreOptions::default();
        let e = engine(&interner, &resolver, &lifetimes, &options);

        let a = Type::Record(
            flowty_algebra::RecordType::new(false, vec![flowty_algebra::RecordField { name: f, ty: Type::Int }])
                .unwrap(),
        );
        let b = Type::Record(
            flowty_algebra::RecordType::new(false, vec![flowty_algebra::RecordField { name: f, ty: Type::Bool }])
                .unwrap(),
        );
        assert!(e.is_empty(&Type::Intersection(vec![a, b])).unwrap());
    }

    #[test]
    fn non_contractive_nominal_is_rejected() {
        let names = Interner::new();
        let x = names.intern("x");
        let interner = TypeInterner::new();
        let resolver = MapResolver::new();
        let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
        let options = CoreOptions::default();
        let e = engine(&interner, &resolver, &lifetimes, &options);
        assert!(!e.is_contractive(x, &Type::Nominal(x)));
    }

    #[test]
    fn nominal_guarded_by_record_is_contractive() {
        let names = Interner::new();
        let x = names.intern("x");
        let next = names.intern("next");
        let interner = TypeInterner::new();
        let resolver = MapResolver::new();
        let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
        let options = CoreOptions::default();
        let e = engine(&interner, &resolver, &lifetimes, &options);
        let record = Type::Record(
            flowty_algebra::RecordType::new(
                false,
                vec![flowty_algebra::RecordField {
                    name: next,
                    ty: Type::Nominal(x),
                }],
            )
            .unwrap(),
        );
        assert!(e.is_contractive(x, &Type::union(vec![Type::Null, record])));
    }

    #[test]
    fn subtype_matches_empty_difference() {
        let interner = TypeInterner::new();
        let resolver = MapResolver::new();
        let names = Interner::new();
        let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
        let options = CoreOptions::default();
        let e = engine(&interner, &resolver, &lifetimes, &options);
        let int_or_null = Type::union(vec![Type::Int, Type::Null]);
        assert!(e.is_subtype(&int_or_null, &Type::Int).unwrap());
        assert!(!e.is_subtype(&Type::Int, &int_or_null).unwrap());
    }
}
