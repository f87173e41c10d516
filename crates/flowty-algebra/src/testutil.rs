//! Test-only collaborator stand-ins, exported (not `#[cfg(test)]`-gated) so
//! downstream crates' own test suites can depend on them without
//! reimplementing a fake name resolver each time.

use crate::resolver::{InternalFailure, NominalBodyResolver};
use crate::types::Type;
use flowty_common::Name;
use rustc_hash::FxHashMap;

/// A `NominalBodyResolver` backed by a plain map, for tests.
#[derive(Default)]
pub struct MapResolver {
    bodies: FxHashMap<Name, Type>,
}

impl MapResolver {
    #[must_use]
    pub fn new() -> Self {
        MapResolver::default()
    }

    #[must_use]
    pub fn with(mut self, name: Name, body: Type) -> Self {
        self.bodies.insert(name, body);
        self
    }

    pub fn insert(&mut self, name: Name, body: Type) {
        self.bodies.insert(name, body);
    }
}

impl NominalBodyResolver for MapResolver {
    fn resolve_nominal_body(&self, name: Name) -> Result<Type, InternalFailure> {
        self.bodies
            .get(&name)
            .cloned()
            .ok_or_else(|| InternalFailure::new(format!("unresolved nominal {name:?}")))
    }
}
