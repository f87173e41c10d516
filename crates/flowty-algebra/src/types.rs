//! Syntactic types (`Type`), spec.md §3.1.
//!
//! `Type` is the currency of the AST: the type terms a declaration actually
//! writes down. Records, callables and nominals carry the invariants spec.md
//! documents (unique field names, syntactic-only callable signatures).

use flowty_common::Name;

pub type LifetimeName = Name;

/// A syntactic type term.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Any,
    Null,
    Bool,
    Byte,
    Int,
    Array(Box<Type>),
    /// `lifetime: None` denotes the implicit enclosing lifetime `this`.
    Reference(Box<Type>, Option<LifetimeName>),
    Record(RecordType),
    Function(CallableSig),
    Method(MethodSig),
    Property(CallableSig),
    /// A reference to a declared type, resolved through the external name
    /// resolver. Never appears already-expanded inside `Type` itself.
    Nominal(Name),
    /// Non-empty by construction: use `Type::union` rather than building
    /// this variant directly.
    Union(Vec<Type>),
    Intersection(Vec<Type>),
    Difference(Box<Type>, Box<Type>),
    Negation(Box<Type>),
}

impl Type {
    #[must_use]
    pub fn array(element: Type) -> Type {
        Type::Array(Box::new(element))
    }

    #[must_use]
    pub fn reference(element: Type, lifetime: Option<LifetimeName>) -> Type {
        Type::Reference(Box::new(element), lifetime)
    }

    #[must_use]
    pub fn difference(lhs: Type, rhs: Type) -> Type {
        Type::Difference(Box::new(lhs), Box::new(rhs))
    }

    #[must_use]
    pub fn negation(element: Type) -> Type {
        Type::Negation(Box::new(element))
    }

    /// Build a union, flattening the degenerate arities: zero members is the
    /// empty type (represented as the zero-member `Union` marker used only
    /// internally by DNF — callers outside this crate should prefer
    /// `Type::Void` intersected with itself for an explicit empty type, or
    /// rely on the decision engine rather than constructing one by hand),
    /// and a single member collapses to that member.
    #[must_use]
    pub fn union(mut members: Vec<Type>) -> Type {
        match members.len() {
            1 => members.pop().expect("len checked"),
            _ => Type::Union(members),
        }
    }

    #[must_use]
    pub fn intersection(mut members: Vec<Type>) -> Type {
        match members.len() {
            1 => members.pop().expect("len checked"),
            _ => Type::Intersection(members),
        }
    }

    /// True for the constructor kinds that DNF treats as atoms: their
    /// contents are not distributed through surrounding unions.
    #[must_use]
    pub const fn is_constructor(&self) -> bool {
        matches!(
            self,
            Type::Array(_)
                | Type::Reference(..)
                | Type::Record(_)
                | Type::Function(_)
                | Type::Method(_)
                | Type::Property(_)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordField {
    pub name: Name,
    pub ty: Type,
}

/// A record type. Field names must be unique; `open` permits additional,
/// unlisted fields on inhabiting values.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordType {
    pub open: bool,
    pub fields: Vec<RecordField>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateFieldError(pub Name);

impl RecordType {
    pub fn new(open: bool, fields: Vec<RecordField>) -> Result<Self, DuplicateFieldError> {
        let mut seen = rustc_hash::FxHashSet::default();
        for field in &fields {
            if !seen.insert(field.name) {
                return Err(DuplicateFieldError(field.name));
            }
        }
        Ok(RecordType { open, fields })
    }

    #[must_use]
    pub fn field(&self, name: Name) -> Option<&Type> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.ty)
    }
}

/// A function or property signature (syntactic, never carries
/// intersection/negation at its top level per spec.md §3.2).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallableSig {
    pub params: Vec<Type>,
    /// A tuple of return types (multi-return callables, spec.md §4.4.1).
    pub returns: Vec<Type>,
}

/// A method signature: a callable that additionally captures lifetimes from
/// its enclosing scope and declares its own lifetime parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodSig {
    pub params: Vec<Type>,
    pub returns: Vec<Type>,
    pub captured_lifetimes: Vec<LifetimeName>,
    pub declared_lifetimes: Vec<LifetimeName>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_rejects_duplicate_field_names() {
        let interner = flowty_common::Interner::new();
        let f = interner.intern("f");
        let fields = vec![
            RecordField {
                name: f,
                ty: Type::Int,
            },
            RecordField {
                name: f,
                ty: Type::Bool,
            },
        ];
        assert!(RecordType::new(false, fields).is_err());
    }

    #[test]
    fn union_of_one_collapses() {
        assert_eq!(Type::union(vec![Type::Int]), Type::Int);
    }
}
