//! Semantic types (`SemanticType`), spec.md §3.2.
//!
//! A superset of `Type` used during flow typing: first-class union,
//! intersection and difference nodes over semantic operands, plus a `Leaf`
//! wrapping an interned syntactic type. Conversion `Type → SemanticType` is
//! injective (`SemanticType::from_type`); the reverse direction is partial
//! and goes through extraction (`flowty-solver::extract`), not this module.

use crate::intern::TypeId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SemanticType {
    Leaf(TypeId),
    Union(Vec<SemanticType>),
    Intersection(Vec<SemanticType>),
    Difference(Box<SemanticType>, Box<SemanticType>),
}

impl SemanticType {
    #[must_use]
    pub fn from_type(id: TypeId) -> Self {
        SemanticType::Leaf(id)
    }

    #[must_use]
    pub fn union(mut members: Vec<SemanticType>) -> Self {
        match members.len() {
            1 => members.pop().expect("len checked"),
            _ => SemanticType::Union(members),
        }
    }

    #[must_use]
    pub fn intersection(mut members: Vec<SemanticType>) -> Self {
        match members.len() {
            1 => members.pop().expect("len checked"),
            _ => SemanticType::Intersection(members),
        }
    }

    #[must_use]
    pub fn difference(lhs: SemanticType, rhs: SemanticType) -> Self {
        SemanticType::Difference(Box::new(lhs), Box::new(rhs))
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, SemanticType::Leaf(_))
    }
}

impl From<TypeId> for SemanticType {
    fn from(id: TypeId) -> Self {
        SemanticType::from_type(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_union_collapses_to_member() {
        let leaf = SemanticType::from_type(TypeId::INT);
        assert_eq!(SemanticType::union(vec![leaf.clone()]), leaf);
    }
}
