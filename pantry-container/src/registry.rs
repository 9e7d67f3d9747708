//! Entry storage shared by services and parameters.
//!
//! [`Entries`] maps string keys to stored values and tracks which keys
//! have been observed. An observed key is frozen: it cannot be written
//! again until it is removed.

use std::any::{Any, type_name};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use pantry_support::rendering::suggest_similar;

use crate::error::{EntryKind, FrozenError, NotFoundError, Operation, PantryError, Result};
use crate::scope::Scope;

/// A type-erased service or parameter value.
pub type Value = Rc<dyn Any>;

/// Type alias for definition functions.
///
/// A definition takes the [`Resolver`] it is being resolved through
/// (to pull other services and parameters) and returns the value or an
/// error.
pub type DefinitionFn = Rc<dyn Fn(&dyn Resolver) -> Result<Value>>;

/// Read access to a container, handed to definition functions.
///
/// Separated from [`Container`](crate::container::Container) so that a
/// decorating container can stay in charge of nested lookups.
pub trait Resolver {
    /// True iff a service definition is registered under `id`.
    fn has(&self, id: &str) -> bool;

    /// Resolves a service and freezes its key.
    fn resolve_any(&self, id: &str) -> Result<Value>;

    /// True iff a parameter is stored under `key`.
    fn contains_param(&self, key: &str) -> bool;

    /// Reads a parameter and freezes its key.
    fn param_any(&self, key: &str) -> Result<Value>;
}

impl dyn Resolver + '_ {
    /// Resolves a service as `T`.
    ///
    /// ```rust,ignore
    /// container.set("service", |r| {
    ///     let component = r.get::<Component>("component")?;
    ///     Ok(Service::new(component))
    /// })?;
    /// ```
    pub fn get<T: 'static>(&self, id: &str) -> Result<Rc<T>> {
        downcast(id, self.resolve_any(id)?)
    }

    /// Reads a parameter as `T`.
    pub fn param<T: 'static>(&self, key: &str) -> Result<Rc<T>> {
        downcast(key, self.param_any(key)?)
    }
}

pub(crate) fn downcast<T: 'static>(key: &str, value: Value) -> Result<Rc<T>> {
    value.downcast::<T>().map_err(|_| PantryError::TypeMismatch {
        key: key.to_string(),
        expected: type_name::<T>(),
    })
}

/// Per-registration cache for singleton definitions.
///
/// Each `set` call builds a fresh `Memo`, so replacing a definition
/// drops the value cached by the previous one.
pub(crate) struct Memo {
    cell: OnceCell<Value>,
    definition: DefinitionFn,
}

impl Memo {
    pub fn wrap(definition: DefinitionFn) -> DefinitionFn {
        let memo = Memo {
            cell: OnceCell::new(),
            definition,
        };
        Rc::new(move |resolver: &dyn Resolver| memo.resolve(resolver))
    }

    fn resolve(&self, resolver: &dyn Resolver) -> Result<Value> {
        self.cell
            .get_or_try_init(|| (self.definition)(resolver))
            .cloned()
    }
}

/// Registration entry for a single service.
pub(crate) struct Registration {
    pub definition: DefinitionFn,
    pub scope: Scope,
    /// How many times `extend` wrapped the original definition.
    pub extensions: usize,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("scope", &self.scope)
            .field("extensions", &self.extensions)
            .finish()
    }
}

/// Keyed store with a frozen set.
///
/// Writes take `&mut self`. Observing a key only needs `&self`, so a
/// definition that is being resolved can still read through the
/// container that owns it.
pub(crate) struct Entries<V> {
    kind: EntryKind,
    entries: HashMap<String, V>,
    frozen: RefCell<HashSet<String>>,
}

impl<V> Entries<V> {
    pub fn new(kind: EntryKind) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
            frozen: RefCell::new(HashSet::new()),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Looks up a key without freezing it.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Looks up a key and freezes it if present.
    pub fn observe(&self, key: &str) -> Option<&V> {
        let entry = self.entries.get(key)?;
        if !self.is_frozen(key) {
            self.frozen.borrow_mut().insert(key.to_string());
        }
        Some(entry)
    }

    pub fn is_frozen(&self, key: &str) -> bool {
        self.frozen.borrow().contains(key)
    }

    /// Fails with [`PantryError::Frozen`] if `key` was already observed.
    pub fn ensure_writable(&self, key: &str, operation: Operation) -> Result<()> {
        if self.is_frozen(key) {
            return Err(PantryError::Frozen(FrozenError {
                kind: self.kind,
                key: key.to_string(),
                operation,
            }));
        }
        Ok(())
    }

    /// Stores `value` under `key` unless the key is frozen.
    ///
    /// # Errors
    /// Returns [`PantryError::Frozen`] and leaves the old entry intact.
    pub fn insert(&mut self, key: String, value: V) -> Result<Option<V>> {
        self.ensure_writable(&key, Operation::Override)?;
        Ok(self.entries.insert(key, value))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Removes the entry and its frozen flag. Absent keys are fine.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.frozen.get_mut().remove(key);
        self.entries.remove(key)
    }

    pub fn not_found(&self, key: &str) -> PantryError {
        let available: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        PantryError::NotFound(NotFoundError {
            kind: self.kind,
            key: key.to_string(),
            suggestions: suggest_similar(key, &available, 3),
        })
    }

    /// Returns all keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn frozen_len(&self) -> usize {
        self.frozen.borrow().len()
    }
}
