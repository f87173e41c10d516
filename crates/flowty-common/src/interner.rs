//! String interning for qualified names (variables, lifetimes, nominal types,
//! record fields, callables).
//!
//! Interning gives us cheap `Copy` equality and hashing for names that flow
//! through the type algebra and the flow typer many times over.

use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex};

/// An interned name. Equality and hashing are by interned index, not string
/// content, so comparing two `Name`s never touches the backing string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(u32);

impl std::fmt::Debug for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

struct InternerState {
    strings: Vec<Arc<str>>,
    lookup: FxHashMap<Arc<str>, u32>,
}

/// A simple sharded-free string interner. Safe to share across threads
/// because independent declarations never mutate the same interner
/// concurrently in this single-invocation core (see the concurrency model),
/// but the driver may check multiple declarations' worth of names from one
/// shared table, so the interner itself is `Sync`.
pub struct Interner {
    state: Mutex<InternerState>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    pub fn new() -> Self {
        Interner {
            state: Mutex::new(InternerState {
                strings: Vec::new(),
                lookup: FxHashMap::default(),
            }),
        }
    }

    pub fn intern(&self, s: &str) -> Name {
        let mut state = self.state.lock().expect("interner lock poisoned");
        if let Some(&idx) = state.lookup.get(s) {
            return Name(idx);
        }
        let idx = state.strings.len() as u32;
        let arc: Arc<str> = Arc::from(s);
        state.strings.push(arc.clone());
        state.lookup.insert(arc, idx);
        Name(idx)
    }

    pub fn resolve(&self, name: Name) -> Arc<str> {
        let state = self.state.lock().expect("interner lock poisoned");
        state.strings[name.0 as usize].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_string_gives_same_name() {
        let interner = Interner::new();
        let a = interner.intern("foo");
        let b = interner.intern("foo");
        assert_eq!(a, b);
    }

    #[test]
    fn interning_distinct_strings_gives_distinct_names() {
        let interner = Interner::new();
        let a = interner.intern("foo");
        let b = interner.intern("bar");
        assert_ne!(a, b);
    }

    #[test]
    fn resolve_round_trips() {
        let interner = Interner::new();
        let name = interner.intern("this");
        assert_eq!(&*interner.resolve(name), "this");
    }
}
