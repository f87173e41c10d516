//! Type terms and DNF normalization — spec components C1 and C2.
//!
//! `flowty-algebra` owns the immutable algebraic representation of types
//! (`Type`, `SemanticType`), their hash-consed interning (`TypeInterner`,
//! `TypeId`), and the rewrite into disjunctive normal form (`to_dnf`,
//! `to_dnf_semantic`) that the decision engine (`flowty-solver`) builds on.

pub mod dnf;
pub mod intern;
pub mod resolver;
pub mod semantic;
pub mod testutil;
pub mod types;

pub use dnf::{Atom, Conjunct, Disjunct, to_dnf, to_dnf_semantic};
pub use intern::{TypeId, TypeInterner};
pub use resolver::{InternalFailure, NominalBodyResolver};
pub use semantic::SemanticType;
pub use types::{CallableSig, DuplicateFieldError, LifetimeName, MethodSig, RecordField, RecordType, Type};
