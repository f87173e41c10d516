//! The decision engine and type extractors — spec components C3 and C4.
//!
//! `flowty-solver` answers `isEmpty`/`isSubtype`/`isContractive` queries
//! over the type algebra (`emptiness`, `subtype`) and computes the
//! readable/writeable/representation projections of compound types
//! (`extract`). Everything here is a pure function of its inputs and the
//! `NominalBodyResolver`/`LifetimeRelation` collaborators; no mutable state
//! survives a single query.

pub mod emptiness;
pub mod extract;
pub mod lifetime;
pub mod subtype;

pub use emptiness::Engine;
pub use extract::{ExtractorKind, Shape};
pub use lifetime::{LifetimeRelation, StaticLifetimeRelation};
pub use subtype::SubtypeChecker;
