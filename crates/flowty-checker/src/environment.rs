//! `TypingEnvironment`, spec.md §3.4 and §4.4.5.
//!
//! Persistent: every refinement returns a new environment sharing structure
//! with its parent (`im::HashMap`'s trie gives us this for free, the same
//! way the teacher's `state_type_environment` threads a `TypeEnvironment`
//! value through statement checking rather than mutating one in place).

use flowty_algebra::SemanticType;
use flowty_common::Name;
use im::HashMap as PersistentMap;

use crate::ast::VarId;

/// Maps declared variables to their currently refined semantic type, and
/// lifetime identifiers to their lexically enclosing lifetime (the "within"
/// relation, spec.md §3.4).
#[derive(Clone, Debug, PartialEq)]
pub enum TypingEnvironment {
    /// An unreachable program point. Propagates through any join.
    Bottom,
    Reachable(ReachableEnv),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReachableEnv {
    refinements: PersistentMap<VarId, SemanticType>,
    enclosing_lifetime: PersistentMap<Name, Name>,
}

impl Default for TypingEnvironment {
    /// The empty environment created at the start of a function body check
    /// (spec.md §3.4's "Lifecycle").
    fn default() -> Self {
        TypingEnvironment::Reachable(ReachableEnv {
            refinements: PersistentMap::new(),
            enclosing_lifetime: PersistentMap::new(),
        })
    }
}

impl TypingEnvironment {
    #[must_use]
    pub fn empty() -> Self {
        TypingEnvironment::default()
    }

    #[must_use]
    pub fn bottom() -> Self {
        TypingEnvironment::Bottom
    }

    #[must_use]
    pub fn is_bottom(&self) -> bool {
        matches!(self, TypingEnvironment::Bottom)
    }

    #[must_use]
    pub fn refined(&self, var: VarId) -> Option<SemanticType> {
        match self {
            TypingEnvironment::Bottom => None,
            TypingEnvironment::Reachable(env) => env.refinements.get(&var).cloned(),
        }
    }

    /// Returns a new environment with `var`'s refined type replaced, or
    /// `self` unchanged if already `BOTTOM`.
    #[must_use]
    pub fn refine(&self, var: VarId, ty: SemanticType) -> Self {
        match self {
            TypingEnvironment::Bottom => TypingEnvironment::Bottom,
            TypingEnvironment::Reachable(env) => {
                let mut next = env.clone();
                next.refinements.insert(var, ty);
                TypingEnvironment::Reachable(next)
            }
        }
    }

    #[must_use]
    pub fn enclosing_lifetime(&self, lifetime: Name) -> Option<Name> {
        match self {
            TypingEnvironment::Bottom => None,
            TypingEnvironment::Reachable(env) => env.enclosing_lifetime.get(&lifetime).copied(),
        }
    }

    #[must_use]
    pub fn with_enclosing_lifetime(&self, lifetime: Name, enclosing: Name) -> Self {
        match self {
            TypingEnvironment::Bottom => TypingEnvironment::Bottom,
            TypingEnvironment::Reachable(env) => {
                let mut next = env.clone();
                next.enclosing_lifetime.insert(lifetime, enclosing);
                TypingEnvironment::Reachable(next)
            }
        }
    }

    /// `join(env1, env2)`, spec.md §4.4.5: keeps only variables refined in
    /// both inputs, unioning their refined types; `join(e, BOTTOM) = e`.
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        match (self, other) {
            (TypingEnvironment::Bottom, e) | (e, TypingEnvironment::Bottom) => e.clone(),
            (TypingEnvironment::Reachable(a), TypingEnvironment::Reachable(b)) => {
                let mut refinements = PersistentMap::new();
                for (var, ty_a) in &a.refinements {
                    if let Some(ty_b) = b.refinements.get(var) {
                        refinements.insert(*var, SemanticType::union(vec![ty_a.clone(), ty_b.clone()]));
                    }
                }
                // The within relation "is preserved from either input (they
                // must agree)": a's entries take precedence, b's fill any it
                // lacks, matching named-block scoping where both branches
                // extend the same lexical lifetime table identically.
                let mut enclosing_lifetime = b.enclosing_lifetime.clone();
                for (lifetime, outer) in &a.enclosing_lifetime {
                    enclosing_lifetime.insert(*lifetime, *outer);
                }
                TypingEnvironment::Reachable(ReachableEnv {
                    refinements,
                    enclosing_lifetime,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowty_algebra::TypeId;
    use flowty_common::Interner;

    fn leaf(id: TypeId) -> SemanticType {
        SemanticType::from_type(id)
    }

    #[test]
    fn join_is_idempotent_and_commutative() {
        let env = TypingEnvironment::empty().refine(VarId(0), leaf(TypeId::INT));
        assert_eq!(env.join(&env), env);

        let other = TypingEnvironment::empty().refine(VarId(0), leaf(TypeId::BOOL));
        assert_eq!(env.join(&other), other.join(&env));
    }

    #[test]
    fn join_with_bottom_is_identity() {
        let env = TypingEnvironment::empty().refine(VarId(0), leaf(TypeId::INT));
        assert_eq!(env.join(&TypingEnvironment::bottom()), env);
        assert_eq!(TypingEnvironment::bottom().join(&env), env);
    }

    #[test]
    fn join_drops_variables_not_refined_in_both() {
        let a = TypingEnvironment::empty()
            .refine(VarId(0), leaf(TypeId::INT))
            .refine(VarId(1), leaf(TypeId::BOOL));
        let b = TypingEnvironment::empty().refine(VarId(0), leaf(TypeId::INT));
        let joined = a.join(&b);
        assert!(joined.refined(VarId(0)).is_some());
        assert!(joined.refined(VarId(1)).is_none());
    }

    #[test]
    fn refine_shares_structure_with_parent() {
        let base = TypingEnvironment::empty()
            .refine(VarId(0), leaf(TypeId::INT))
            .refine(VarId(1), leaf(TypeId::BOOL));
        let refined = base.refine(VarId(0), leaf(TypeId::NULL));
        // The parent is untouched by the persistent update.
        assert_eq!(base.refined(VarId(0)), Some(leaf(TypeId::INT)));
        assert_eq!(refined.refined(VarId(0)), Some(leaf(TypeId::NULL)));
        assert_eq!(refined.refined(VarId(1)), Some(leaf(TypeId::BOOL)));
    }

    #[test]
    fn lifetime_within_relation_round_trips() {
        let names = Interner::new();
        let this = names.intern("this");
        let outer = names.intern("outer");
        let env = TypingEnvironment::empty().with_enclosing_lifetime(this, outer);
        assert_eq!(env.enclosing_lifetime(this), Some(outer));
    }
}
