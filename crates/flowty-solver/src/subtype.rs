//! Subtyping entry point, spec.md §4.2.
//!
//! `isSubtype` is fully determined by `isEmpty` (`Engine::is_subtype` in
//! [`crate::emptiness`]); this module just hosts the universal-property
//! tests (§8.2-3) that exercise the pair together, since they read more
//! naturally against the public `SubtypeChecker` name the checker crate
//! imports rather than against the emptiness engine directly.

use flowty_algebra::{InternalFailure, Type};

use crate::emptiness::Engine;

/// A thin, named facade over [`Engine`] for callers that only need
/// subtyping/contractiveness and would rather not spell out `emptiness::Engine`.
pub struct SubtypeChecker<'a> {
    engine: &'a Engine<'a>,
}

impl<'a> SubtypeChecker<'a> {
    #[must_use]
    pub fn new(engine: &'a Engine<'a>) -> Self {
        SubtypeChecker { engine }
    }

    pub fn is_subtype(&self, lhs: &Type, rhs: &Type) -> Result<bool, InternalFailure> {
        self.engine.is_subtype(lhs, rhs)
    }

    pub fn is_empty(&self, ty: &Type) -> Result<bool, InternalFailure> {
        self.engine.is_empty(ty)
    }

    pub fn is_contractive(&self, name: flowty_common::Name, body: &Type) -> bool {
        self.engine.is_contractive(name, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifetime::StaticLifetimeRelation;
    use flowty_algebra::testutil::MapResolver;
    use flowty_algebra::TypeInterner;
    use flowty_common::{CoreOptions, Interner};

    #[test]
    fn is_subtype_reflexive_and_transitive() {
        let interner = TypeInterner::new();
        let resolver = MapResolver::new();
        let names = Interner::new();
        let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
        let options = CoreOptions::default();
        let engine = Engine::new(&interner, &resolver, &lifetimes, &options);
        let checker = SubtypeChecker::new(&engine);

        assert!(checker.is_subtype(&Type::Int, &Type::Int).unwrap());

        let int_or_null = Type::union(vec![Type::Int, Type::Null]);
        let int_or_null_or_bool = Type::union(vec![Type::Int, Type::Null, Type::Bool]);
        assert!(checker.is_subtype(&int_or_null_or_bool, &int_or_null).unwrap());
        assert!(checker.is_subtype(&int_or_null_or_bool, &Type::Int).unwrap());
    }

    #[test]
    fn is_subtype_antisymmetric_modulo_equality() {
        let interner = TypeInterner::new();
        let resolver = MapResolver::new();
        let names = Interner::new();
        let lifetimes = StaticLifetimeRelation::new(names.intern("*"));
        let options = CoreOptions::default();
        let engine = Engine::new(&interner, &resolver, &lifetimes, &options);
        let checker = SubtypeChecker::new(&engine);

        let a = Type::union(vec![Type::Int, Type::Bool]);
        let b = Type::union(vec![Type::Bool, Type::Int]);
        assert!(checker.is_subtype(&a, &b).unwrap());
        assert!(checker.is_subtype(&b, &a).unwrap());
    }
}
