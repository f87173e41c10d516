//! The lifetime collaborator boundary, spec.md §6.1.
//!
//! `LifetimeRelation` is consumed, not implemented, by the core: the driver
//! supplies a concrete binder-backed implementation. `isWithin` must be a
//! preorder (reflexive, transitive) with `"*"` as its top element; the
//! engine relies on those laws but never verifies them.

use flowty_common::Name;

/// Decides nesting between lifetime identifiers.
///
/// Implementations must satisfy:
/// - `is_within(x, x)` for all `x` (reflexivity),
/// - `is_within(x, y) && is_within(y, z) ⟹ is_within(x, z)` (transitivity),
/// - `is_within(x, outermost())` for all `x`.
pub trait LifetimeRelation {
    fn is_within(&self, inner: Name, outer: Name) -> bool;

    /// The name bound to the outermost lifetime, `*`.
    fn outermost(&self) -> Name;
}

/// A `LifetimeRelation` over a fixed, precomputed nesting table — sufficient
/// for tests and for drivers whose lifetime scopes are resolved up front.
pub struct StaticLifetimeRelation {
    outermost: Name,
    within: rustc_hash::FxHashSet<(Name, Name)>,
}

impl StaticLifetimeRelation {
    #[must_use]
    pub fn new(outermost: Name) -> Self {
        StaticLifetimeRelation {
            outermost,
            within: rustc_hash::FxHashSet::default(),
        }
    }

    /// Declares `inner` directly nested within `outer`. Transitive closure
    /// and reflexivity are handled by `is_within`, not stored here.
    pub fn declare(&mut self, inner: Name, outer: Name) {
        self.within.insert((inner, outer));
    }
}

impl LifetimeRelation for StaticLifetimeRelation {
    fn is_within(&self, inner: Name, outer: Name) -> bool {
        if inner == outer || outer == self.outermost {
            return true;
        }
        // Transitive closure via bounded BFS over declared edges: lifetime
        // nesting depth in practice is shallow (source-scope depth), so a
        // linear scan per step is cheap and needs no extra index.
        let mut frontier = vec![inner];
        let mut seen = rustc_hash::FxHashSet::default();
        while let Some(cur) = frontier.pop() {
            if cur == outer {
                return true;
            }
            if !seen.insert(cur) {
                continue;
            }
            for (i, o) in &self.within {
                if *i == cur {
                    frontier.push(*o);
                }
            }
        }
        false
    }

    fn outermost(&self) -> Name {
        self.outermost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowty_common::Interner;

    #[test]
    fn reflexive_and_outermost() {
        let names = Interner::new();
        let star = names.intern("*");
        let this = names.intern("this");
        let rel = StaticLifetimeRelation::new(star);
        assert!(rel.is_within(this, this));
        assert!(rel.is_within(this, star));
    }

    #[test]
    fn transitive_through_declared_edges() {
        let names = Interner::new();
        let star = names.intern("*");
        let a = names.intern("a");
        let b = names.intern("b");
        let c = names.intern("c");
        let mut rel = StaticLifetimeRelation::new(star);
        rel.declare(a, b);
        rel.declare(b, c);
        assert!(rel.is_within(a, c));
        assert!(!rel.is_within(c, a));
    }
}
