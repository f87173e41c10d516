//! The nominal-resolution collaborator consumed by DNF normalization
//! (spec.md §6.1's name resolver, restricted to the "give me this nominal's
//! body" fragment C2 needs).
//!
//! Resolution failures are fatal per spec.md §4.1 ("Any resolution failure
//! is a fatal internal condition, not a typed user error") — they propagate
//! as `InternalFailure`, never as a recoverable diagnostic.

use crate::types::Type;

#[derive(Debug, Clone)]
pub struct InternalFailure {
    pub message: String,
}

impl InternalFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        InternalFailure {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for InternalFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "internal failure: {}", self.message)
    }
}

impl std::error::Error for InternalFailure {}

/// Resolves a nominal type name to the body it was declared with.
pub trait NominalBodyResolver {
    /// Returns the declared body of the nominal type named `name`, or an
    /// `InternalFailure` if `name` cannot be resolved.
    fn resolve_nominal_body(&self, name: flowty_common::Name) -> Result<Type, InternalFailure>;
}
