//! Recursion and iteration guards for the decision engine.
//!
//! DNF normalization and nominal unfolding can both recurse arbitrarily
//! deep on adversarial input (spec.md §5: "DNF normalization may allocate
//! `O(2^n)` conjuncts in adversarial cases"). `RecursionGuard` tracks depth
//! and a visiting-set (for cycle detection during nominal unfolding) and
//! reports exhaustion instead of overflowing the stack.

use rustc_hash::FxHashSet;
use std::hash::Hash;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Used while deciding `isSubtype`/`isEmpty`.
    SubtypeCheck,
    /// Used while evaluating/normalizing a type to DNF.
    TypeEvaluation,
    /// Used for shallow one-level traversals (e.g. extractor dispatch).
    ShallowTraversal,
    Custom {
        max_depth: usize,
        max_iterations: usize,
    },
}

impl RecursionProfile {
    #[must_use]
    pub const fn max_depth(self) -> usize {
        match self {
            RecursionProfile::SubtypeCheck => 100,
            RecursionProfile::TypeEvaluation => 50,
            RecursionProfile::ShallowTraversal => 20,
            RecursionProfile::Custom { max_depth, .. } => max_depth,
        }
    }

    #[must_use]
    pub const fn max_iterations(self) -> usize {
        match self {
            RecursionProfile::SubtypeCheck
            | RecursionProfile::TypeEvaluation
            | RecursionProfile::ShallowTraversal => 100_000,
            RecursionProfile::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecursionResult {
    /// The key was not being visited; it is now on the stack.
    Entered,
    /// The key is already on the stack: a cycle was found.
    Cycle,
    /// Depth or iteration budget exhausted.
    Exhausted,
}

/// A depth/iteration/cycle guard parameterized over the key type used to
/// detect revisits (a nominal name during unfolding, a `TypeId` during
/// normalization, ...).
pub struct RecursionGuard<K: Eq + Hash + Clone> {
    profile: RecursionProfile,
    stack: Vec<K>,
    visiting: FxHashSet<K>,
    iterations: usize,
}

impl<K: Eq + Hash + Clone> RecursionGuard<K> {
    #[must_use]
    pub fn new(max_depth: usize, max_iterations: usize) -> Self {
        Self::with_profile(RecursionProfile::Custom {
            max_depth,
            max_iterations,
        })
    }

    #[must_use]
    pub fn with_profile(profile: RecursionProfile) -> Self {
        RecursionGuard {
            profile,
            stack: Vec::new(),
            visiting: FxHashSet::default(),
            iterations: 0,
        }
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.profile.max_depth()
    }

    #[must_use]
    pub fn max_iterations(&self) -> usize {
        self.profile.max_iterations()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    #[must_use]
    pub fn is_exceeded(&self) -> bool {
        self.stack.len() >= self.max_depth() || self.iterations >= self.max_iterations()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.stack.is_empty()
    }

    #[must_use]
    pub fn visiting_count(&self) -> usize {
        self.visiting.len()
    }

    #[must_use]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.visiting.contains(key)
    }

    /// Try to push `key` onto the recursion stack.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations += 1;
        if self.iterations > self.max_iterations() {
            return RecursionResult::Exhausted;
        }
        if self.visiting.contains(&key) {
            return RecursionResult::Cycle;
        }
        if self.stack.len() >= self.max_depth() {
            return RecursionResult::Exhausted;
        }
        self.visiting.insert(key.clone());
        self.stack.push(key);
        RecursionResult::Entered
    }

    /// Pop the most recently entered key.
    pub fn leave(&mut self) {
        if let Some(key) = self.stack.pop() {
            self.visiting.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_subtype_check_limits() {
        let p = RecursionProfile::SubtypeCheck;
        assert_eq!(p.max_depth(), 100);
        assert_eq!(p.max_iterations(), 100_000);
    }

    #[test]
    fn basic_enter_leave() {
        let mut guard: RecursionGuard<u32> = RecursionGuard::new(10, 100);
        assert_eq!(guard.enter(1u32), RecursionResult::Entered);
        assert_eq!(guard.depth(), 1);
        assert!(guard.is_visiting(&1));
        guard.leave();
        assert_eq!(guard.depth(), 0);
        assert!(!guard.is_visiting(&1));
    }

    #[test]
    fn reentering_same_key_is_a_cycle() {
        let mut guard: RecursionGuard<&str> = RecursionGuard::new(10, 100);
        assert_eq!(guard.enter("X"), RecursionResult::Entered);
        assert_eq!(guard.enter("X"), RecursionResult::Cycle);
    }

    #[test]
    fn depth_budget_is_enforced() {
        let mut guard: RecursionGuard<u32> = RecursionGuard::new(2, 100);
        assert_eq!(guard.enter(1), RecursionResult::Entered);
        assert_eq!(guard.enter(2), RecursionResult::Entered);
        assert_eq!(guard.enter(3), RecursionResult::Exhausted);
    }
}
