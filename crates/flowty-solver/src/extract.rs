//! Type extractors, spec.md §4.3 (C4).
//!
//! Three sibling extractors share a skeleton: normalize to DNF, combine each
//! conjunct's positive atoms with a shape-specific `intersect`, subtract
//! negatives with a shape-specific `subtract`, then union the per-conjunct
//! results. Conjuncts the decision engine proves empty contribute nothing.

use flowty_algebra::{Atom, Conjunct, InternalFailure, Type};

use crate::emptiness::Engine;

/// Which extractor is asking — each answers a different "can I treat this
/// compound type as a single array/record/reference/callable shape" question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractorKind {
    /// Largest type safe to *read*: unions of arrays combine elements by
    /// union, unions of records combine fields by union and widen to open.
    Readable,
    /// Largest type safe to *write*: unions of arrays combine elements by
    /// intersection, unions of records combine fields by intersection.
    Writeable,
    /// Smallest simple (intersection/negation-free) enclosing type, for the
    /// boundary to a lower IR.
    Representation,
}

/// What shape the caller wants extracted out of a compound type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Array,
    Record,
    Reference,
    Callable,
}

impl<'a> Engine<'a> {
    /// Computes the extractor-specific projection of `ty` for the requested
    /// `shape`. Returns `None` when no conjunct contributes a candidate (the
    /// "no extraction" case, e.g. asking for the readable array type of
    /// `Int`).
    pub fn extract(
        &self,
        kind: ExtractorKind,
        shape: Shape,
        ty: &Type,
    ) -> Result<Option<Type>, InternalFailure> {
        let dnf = flowty_algebra::to_dnf(ty, self.interner, self.resolver)?;
        let mut acc: Option<Type> = None;
        for conjunct in &dnf.conjuncts {
            if self.conjunct_is_empty(conjunct)? {
                continue;
            }
            let Some(candidate) = self.conjunct_candidate(kind, shape, conjunct)? else {
                continue;
            };
            acc = Some(match acc {
                None => candidate,
                Some(prev) => self.extractor_union(kind, prev, candidate),
            });
        }
        Ok(acc)
    }

    fn conjunct_candidate(
        &self,
        kind: ExtractorKind,
        shape: Shape,
        conjunct: &Conjunct,
    ) -> Result<Option<Type>, InternalFailure> {
        let mut positive_acc: Option<Type> = None;
        for atom in &conjunct.positives {
            let Some(candidate) = self.atom_as_shape(shape, atom) else {
                continue;
            };
            positive_acc = Some(match positive_acc {
                None => candidate,
                Some(prev) => self.extractor_intersect(kind, shape, prev, candidate),
            });
        }
        let Some(mut positive) = positive_acc else {
            return Ok(None);
        };
        for atom in &conjunct.negatives {
            if let Some(negative) = self.atom_as_shape(shape, atom) {
                positive = self.extractor_subtract(kind, shape, positive, negative);
            }
        }
        Ok(Some(self.simplify_for(kind, positive)))
    }

    fn atom_as_shape(&self, shape: Shape, atom: &Atom) -> Option<Type> {
        let Atom::Compound(id) = atom else {
            return None;
        };
        let ty = self.interner.lookup(*id);
        match (shape, &*ty) {
            (Shape::Array, Type::Array(_))
            | (Shape::Record, Type::Record(_))
            | (Shape::Reference, Type::Reference(..)) => Some((*ty).clone()),
            (Shape::Callable, Type::Function(_) | Type::Method(_) | Type::Property(_)) => {
                Some((*ty).clone())
            }
            _ => None,
        }
    }

    fn extractor_intersect(&self, _kind: ExtractorKind, shape: Shape, a: Type, b: Type) -> Type {
        match (shape, a, b) {
            (Shape::Array, Type::Array(ea), Type::Array(eb)) => {
                Type::array(Type::intersection(vec![*ea, *eb]))
            }
            (Shape::Record, Type::Record(ra), Type::Record(rb)) => {
                let open = ra.open && rb.open;
                self.merge_record_fields(ra, rb, |x, y| Type::intersection(vec![x, y]), open)
            }
            (_, a, _) => a,
        }
    }

    fn extractor_subtract(&self, _kind: ExtractorKind, shape: Shape, a: Type, b: Type) -> Type {
        match (shape, a, b) {
            (Shape::Array, Type::Array(ea), Type::Array(eb)) => {
                Type::array(Type::difference(*ea, *eb))
            }
            (_, a, _) => a,
        }
    }

    fn extractor_union(&self, kind: ExtractorKind, a: Type, b: Type) -> Type {
        match (a, b) {
            (Type::Array(ea), Type::Array(eb)) => {
                let combine = match kind {
                    ExtractorKind::Writeable => Type::intersection(vec![*ea, *eb]),
                    _ => Type::union(vec![*ea, *eb]),
                };
                Type::array(combine)
            }
            (Type::Record(ra), Type::Record(rb)) => {
                let field_combine: fn(Type, Type) -> Type = match kind {
                    ExtractorKind::Writeable => |x, y| Type::intersection(vec![x, y]),
                    _ => |x, y| Type::union(vec![x, y]),
                };
                // A union of record shapes is open unless both are closed and
                // writing requires every field to remain required.
                let open = match kind {
                    ExtractorKind::Writeable => ra.open && rb.open,
                    _ => true,
                };
                self.merge_record_fields(ra, rb, field_combine, open)
            }
            (a, _) => a,
        }
    }

    fn merge_record_fields(
        &self,
        a: flowty_algebra::RecordType,
        b: flowty_algebra::RecordType,
        combine: impl Fn(Type, Type) -> Type,
        open: bool,
    ) -> Type {
        let mut fields = Vec::new();
        for field in &a.fields {
            let ty = match b.field(field.name) {
                Some(other) => combine(field.ty.clone(), other.clone()),
                None => field.ty.clone(),
            };
            fields.push(flowty_algebra::RecordField { name: field.name, ty });
        }
        for field in &b.fields {
            if a.field(field.name).is_none() {
                fields.push(field.clone());
            }
        }
        match flowty_algebra::RecordType::new(open, fields) {
            Ok(rt) => Type::Record(rt),
            // Field lists from two well-formed records can't collide: each
            // side's own fields are already unique and we visit each name once.
            Err(_) => Type::Record(flowty_algebra::RecordType::new(open, Vec::new()).expect("empty record")),
        }
    }

    fn simplify_for(&self, kind: ExtractorKind, ty: Type) -> Type {
        if kind != ExtractorKind::Representation {
            return ty;
        }
        strip_to_simple(ty)
    }
}

/// Drops intersections and negations from a simple-type request, replacing
/// them with their representation-safe approximation: an intersection
/// widens to its first operand's shape, a negation widens to `Any`.
fn strip_to_simple(ty: Type) -> Type {
    match ty {
        Type::Intersection(mut members) if !members.is_empty() => strip_to_simple(members.remove(0)),
        Type::Negation(_) => Type::Any,
        Type::Array(e) => Type::array(strip_to_simple(*e)),
        Type::Reference(e, l) => Type::reference(strip_to_simple(*e), l),
        Type::Record(r) => {
            let fields = r
                .fields
                .into_iter()
                .map(|f| flowty_algebra::RecordField {
                    name: f.name,
                    ty: strip_to_simple(f.ty),
                })
                .collect();
            Type::Record(flowty_algebra::RecordType::new(r.open, fields).expect("field names already unique"))
        }
        Type::Union(members) => Type::union(members.into_iter().map(strip_to_simple).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifetime::StaticLifetimeRelation;
    use flowty_algebra::testutil::MapResolver;
    use flowty_algebra::{RecordField, RecordType, TypeInterner};
    use flowty_common::{CoreOptions, Interner};

    #[test]
    fn readable_union_of_records_unions_matching_fields() {
        let interner = TypeInterner::new();
        let resolver = MapResolver::new();
        let names = Interner::new();
        let f = names.intern("f");
        let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
        let options = CoreOptions::default();
        let e = Engine::new(&interner, &resolver, &lifetimes, &options);

        let a = Type::Record(RecordType::new(false, vec![RecordField { name: f, ty: Type::Int }]).unwrap());
        let b = Type::Record(RecordType::new(false, vec![RecordField { name: f, ty: Type::Bool }]).unwrap());
        let extracted = e
            .extract(ExtractorKind::Readable, Shape::Record, &Type::union(vec![a, b]))
            .unwrap()
            .unwrap();
        match extracted {
            Type::Record(r) => {
                assert!(r.open);
                assert_eq!(r.field(f), Some(&Type::union(vec![Type::Int, Type::Bool])));
            }
            other => panic!("expected a record, got {other:?}"),
        }
    }

    #[test]
    fn extracting_an_array_shape_from_a_primitive_yields_nothing() {
        let interner = TypeInterner::new();
        let resolver = MapResolver::new();
        let names = Interner::new();
        let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
        let options = CoreOptions::default();
        let e = Engine::new(&interner, &resolver, &lifetimes, &options);
        assert_eq!(e.extract(ExtractorKind::Readable, Shape::Array, &Type::Int).unwrap(), None);
    }

    #[test]
    fn writeable_union_of_arrays_intersects_elements() {
        let interner = TypeInterner::new();
        let resolver = MapResolver::new();
        let names = Interner::new();
        let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
        let options = CoreOptions::default();
        let e = Engine::new(&interner, &resolver, &lifetimes, &options);
        let ty = Type::union(vec![Type::array(Type::Int), Type::array(Type::union(vec![Type::Int, Type::Bool]))]);
        let extracted = e.extract(ExtractorKind::Writeable, Shape::Array, &ty).unwrap().unwrap();
        assert_eq!(
            extracted,
            Type::array(Type::intersection(vec![Type::Int, Type::union(vec![Type::Int, Type::Bool])]))
        );
    }
}
