//! Hash-consing interner for `Type`, grounded on the teacher's
//! `TypeInterner`/`TypeId` pattern (seen throughout `tsz-solver`'s test
//! suite: `interner.union2(...)`, `TypeId::NUMBER`, `interner.lookup(id)`).
//!
//! Interning gives structural equality of compound types a cheap `TypeId`
//! comparison once built, and lets the DNF atoms (`Atom::Compound`) refer to
//! an array/record/reference/callable type without re-allocating it.

use crate::types::Type;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl std::fmt::Debug for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

impl TypeId {
    pub const VOID: TypeId = TypeId(0);
    pub const ANY: TypeId = TypeId(1);
    pub const NULL: TypeId = TypeId(2);
    pub const BOOL: TypeId = TypeId(3);
    pub const BYTE: TypeId = TypeId(4);
    pub const INT: TypeId = TypeId(5);

    const ATOM_COUNT: u32 = 6;
}

struct InternerState {
    types: Vec<Arc<Type>>,
    lookup: FxHashMap<Arc<Type>, u32>,
}

pub struct TypeInterner {
    state: Mutex<InternerState>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    #[must_use]
    pub fn new() -> Self {
        let atoms = [
            Type::Void,
            Type::Any,
            Type::Null,
            Type::Bool,
            Type::Byte,
            Type::Int,
        ];
        let mut types = Vec::with_capacity(atoms.len());
        let mut lookup = FxHashMap::default();
        for (idx, atom) in atoms.into_iter().enumerate() {
            let arc = Arc::new(atom);
            lookup.insert(arc.clone(), idx as u32);
            types.push(arc);
        }
        debug_assert_eq!(types.len() as u32, TypeId::ATOM_COUNT);
        TypeInterner {
            state: Mutex::new(InternerState { types, lookup }),
        }
    }

    pub fn intern(&self, ty: Type) -> TypeId {
        let mut state = self.state.lock().expect("interner lock poisoned");
        if let Some(&id) = state.lookup.get(&ty) {
            return TypeId(id);
        }
        let id = state.types.len() as u32;
        let arc = Arc::new(ty);
        state.types.push(arc.clone());
        state.lookup.insert(arc, id);
        TypeId(id)
    }

    #[must_use]
    pub fn lookup(&self, id: TypeId) -> Arc<Type> {
        let state = self.state.lock().expect("interner lock poisoned");
        state.types[id.0 as usize].clone()
    }

    #[must_use]
    pub fn array(&self, element: TypeId) -> TypeId {
        self.intern(Type::array((*self.lookup(element)).clone()))
    }

    #[must_use]
    pub fn union2(&self, a: TypeId, b: TypeId) -> TypeId {
        if a == TypeId::ANY || b == TypeId::ANY {
            return TypeId::ANY;
        }
        if a == b {
            return a;
        }
        self.intern(Type::union(vec![
            (*self.lookup(a)).clone(),
            (*self.lookup(b)).clone(),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_structural_type_gives_same_id() {
        let interner = TypeInterner::new();
        let a = interner.array(TypeId::INT);
        let b = interner.array(TypeId::INT);
        assert_eq!(a, b);
    }

    #[test]
    fn interning_distinct_types_gives_distinct_ids() {
        let interner = TypeInterner::new();
        let a = interner.array(TypeId::INT);
        let b = interner.array(TypeId::BOOL);
        assert_ne!(a, b);
    }

    #[test]
    fn atoms_are_preseeded() {
        let interner = TypeInterner::new();
        assert_eq!(*interner.lookup(TypeId::INT), Type::Int);
        assert_eq!(*interner.lookup(TypeId::ANY), Type::Any);
    }

    #[test]
    fn union_with_any_normalizes_to_any() {
        let interner = TypeInterner::new();
        assert_eq!(interner.union2(TypeId::INT, TypeId::ANY), TypeId::ANY);
    }
}
