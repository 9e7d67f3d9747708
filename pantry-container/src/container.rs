//! # The Container — heart of Pantry
//!
//! A string-keyed registry of services and parameters.
//!
//! # Lifecycle of a key
//! ```text
//! set / set_builder / extend / set_param        (mutable)
//!                  │
//!          get / param (first read)
//!                  │
//!                  ▼
//!               frozen  ──remove / remove_param──>  absent
//! ```
//!
//! # Examples
//! ```rust
//! use pantry_container::prelude::*;
//! use std::rc::Rc;
//!
//! struct Component {
//!     prefix: String,
//! }
//!
//! struct Service {
//!     component: Rc<Component>,
//!     format: String,
//! }
//!
//! # fn main() -> Result<()> {
//! let mut container = Container::new();
//! container
//!     .set_param("format", String::from("json"))?
//!     .set("component", |_| Ok(Component { prefix: "#".into() }))?
//!     .set("service", |r| {
//!         Ok(Service {
//!             component: r.get::<Component>("component")?,
//!             format: r.param::<String>("format")?.to_string(),
//!         })
//!     })?;
//!
//! let service = container.get::<Service>("service")?;
//! assert_eq!(service.component.prefix, "#");
//! assert_eq!(service.format, "json");
//!
//! // "service" was read, so it can no longer be redefined
//! assert!(container.set("service", |_| Ok(0u8)).is_err());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::rc::Rc;

use tracing::{debug, instrument, trace};

use crate::error::{EntryKind, Operation, Result};
use crate::provider::Provider;
use crate::registry::{DefinitionFn, Entries, Memo, Registration, Resolver, Value, downcast};
use crate::resolution::ResolutionStack;
use crate::scope::Scope;

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// Dependency injection container with freeze-on-read semantics.
///
/// Registration needs `&mut self`; reads only need `&self`, which is
/// what definitions see while they run.
///
/// The container is single-threaded (`!Send`, `!Sync`). Wrap it
/// externally or keep one per thread if several threads need it.
pub struct Container {
    services: Entries<Registration>,
    parameters: Entries<Value>,
    resolving: ResolutionStack,
}

impl Container {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self {
            services: Entries::new(EntryKind::Service),
            parameters: Entries::new(EntryKind::Parameter),
            resolving: ResolutionStack::new(),
        }
    }

    // ── Services ──

    /// Checks if a service definition is registered. Does not freeze.
    pub fn has(&self, id: &str) -> bool {
        self.services.contains(id)
    }

    /// Resolves a service as `T` and freezes `id`.
    ///
    /// ```rust,ignore
    /// let mailer: Rc<Mailer> = container.get("mailer")?;
    /// ```
    ///
    /// # Errors
    /// - [`PantryError::NotFound`](crate::error::PantryError::NotFound) if `id` is not registered
    /// - [`PantryError::TypeMismatch`](crate::error::PantryError::TypeMismatch) if the value is not a `T`
    /// - whatever the definition itself returns
    pub fn get<T: 'static>(&self, id: &str) -> Result<Rc<T>> {
        downcast(id, self.get_any(id)?)
    }

    /// Resolves a service without downcasting it.
    pub fn get_any(&self, id: &str) -> Result<Value> {
        self.resolve_with(id, self)
    }

    /// Resolves `id`, handing `resolver` to its definition.
    ///
    /// The key is frozen before the definition runs, so a failing
    /// definition still freezes it.
    pub(crate) fn resolve_with(&self, id: &str, resolver: &dyn Resolver) -> Result<Value> {
        let registration = self
            .services
            .observe(id)
            .ok_or_else(|| self.services.not_found(id))?;
        let definition = registration.definition.clone();

        let _guard = self.resolving.enter(id)?;
        trace!(key = id, scope = %registration.scope, depth = self.resolving.depth(), "Resolving");
        definition(resolver)
    }

    /// Registers a singleton definition.
    ///
    /// The definition runs on the first `get(id)`; its value is cached
    /// and returned by every later `get(id)`. Each call installs a new
    /// cache, so redefining an unfrozen key discards the old value.
    ///
    /// # Errors
    /// [`PantryError::Frozen`](crate::error::PantryError::Frozen) if `id` was already resolved.
    pub fn set<T, F>(&mut self, id: impl Into<String>, definition: F) -> Result<&mut Self>
    where
        T: 'static,
        F: Fn(&dyn Resolver) -> Result<T> + 'static,
    {
        let definition = Memo::wrap(erase(definition));
        self.register(id.into(), definition, Scope::Singleton)
    }

    /// Registers a builder definition, invoked on every `get(id)`.
    ///
    /// # Errors
    /// [`PantryError::Frozen`](crate::error::PantryError::Frozen) if `id` was already resolved.
    pub fn set_builder<T, F>(&mut self, id: impl Into<String>, definition: F) -> Result<&mut Self>
    where
        T: 'static,
        F: Fn(&dyn Resolver) -> Result<T> + 'static,
    {
        self.register(id.into(), erase(definition), Scope::Builder)
    }

    /// Decorates an existing definition.
    ///
    /// The new definition resolves the old one and passes its value to
    /// `extension`. No cache is added: the extension runs on every
    /// `get`, while a singleton's original value stays cached inside
    /// the wrapped definition.
    ///
    /// ```rust,ignore
    /// container.extend("mailer", |mailer: Rc<Mailer>, r| {
    ///     Ok(Rc::new(LoggingMailer::new(mailer, r.get("logger")?)))
    /// })?;
    /// ```
    ///
    /// # Errors
    /// - [`PantryError::Frozen`](crate::error::PantryError::Frozen) if `id` was already resolved
    /// - [`PantryError::NotFound`](crate::error::PantryError::NotFound) if `id` is not registered
    pub fn extend<T, U, F>(&mut self, id: &str, extension: F) -> Result<&mut Self>
    where
        T: 'static,
        U: 'static,
        F: Fn(Rc<T>, &dyn Resolver) -> Result<Rc<U>> + 'static,
    {
        self.services.ensure_writable(id, Operation::Extend)?;
        let Some(registration) = self.services.get_mut(id) else {
            return Err(self.services.not_found(id));
        };

        let previous = registration.definition.clone();
        let key = id.to_string();

        registration.definition = Rc::new(move |resolver: &dyn Resolver| {
            let value = downcast::<T>(&key, previous(resolver)?)?;
            Ok(extension(value, resolver)? as Value)
        });
        registration.extensions += 1;

        debug!(
            key = id,
            scope = %registration.scope,
            extensions = registration.extensions,
            "Extended definition"
        );
        Ok(self)
    }

    /// Removes a definition and unfreezes `id`. Always succeeds.
    pub fn remove(&mut self, id: &str) -> &mut Self {
        if self.services.remove(id).is_some() {
            debug!(key = id, "Removed definition");
        }
        self
    }

    /// How `id` was registered, if it is.
    pub fn scope_of(&self, id: &str) -> Option<Scope> {
        self.services.peek(id).map(|r| r.scope)
    }

    /// True once `id` has been resolved (until it is removed).
    pub fn is_frozen(&self, id: &str) -> bool {
        self.services.is_frozen(id)
    }

    /// Registered service ids, sorted.
    pub fn service_ids(&self) -> Vec<String> {
        self.services.keys()
    }

    // ── Parameters ──

    /// Checks if a parameter is stored. Does not freeze.
    pub fn contains_param(&self, key: &str) -> bool {
        self.parameters.contains(key)
    }

    /// Reads a parameter as `T` and freezes `key`.
    ///
    /// The key is frozen as soon as it is found, even when the stored
    /// value turns out not to be a `T`.
    pub fn param<T: 'static>(&self, key: &str) -> Result<Rc<T>> {
        downcast(key, self.param_any(key)?)
    }

    /// Reads a parameter without downcasting it.
    pub fn param_any(&self, key: &str) -> Result<Value> {
        let value = self
            .parameters
            .observe(key)
            .cloned()
            .ok_or_else(|| self.parameters.not_found(key))?;
        trace!(key = %key, "Read parameter");
        Ok(value)
    }

    /// Stores a parameter.
    ///
    /// The value is kept as-is; a closure stored here is returned by
    /// [`param`](Self::param), never invoked by the container.
    ///
    /// # Errors
    /// [`PantryError::Frozen`](crate::error::PantryError::Frozen) if `key` was already read.
    pub fn set_param<T: 'static>(&mut self, key: impl Into<String>, value: T) -> Result<&mut Self> {
        let key = key.into();
        self.parameters.insert(key.clone(), Rc::new(value))?;
        debug!(key = %key, "Stored parameter");
        Ok(self)
    }

    /// Removes a parameter and unfreezes `key`. Always succeeds.
    pub fn remove_param(&mut self, key: &str) -> &mut Self {
        if self.parameters.remove(key).is_some() {
            debug!(key = %key, "Removed parameter");
        }
        self
    }

    /// True once `key` has been read (until it is removed).
    pub fn is_param_frozen(&self, key: &str) -> bool {
        self.parameters.is_frozen(key)
    }

    /// Stored parameter keys, sorted.
    pub fn param_keys(&self) -> Vec<String> {
        self.parameters.keys()
    }

    // ── Provider modules ──

    /// Runs a [`Provider`] against this container.
    #[instrument(skip(self, provider), fields(provider = provider.name()))]
    pub fn register_provider(&mut self, provider: &dyn Provider) -> Result<&mut Self> {
        provider.register(self)?;
        debug!(services = self.services.len(), parameters = self.parameters.len(), "Provider registered");
        Ok(self)
    }

    // ── Internal ──

    fn register(&mut self, id: String, definition: DefinitionFn, scope: Scope) -> Result<&mut Self> {
        let registration = Registration {
            definition,
            scope,
            extensions: 0,
        };
        let replaced = self.services.insert(id.clone(), registration)?;
        debug!(
            key = %id,
            scope = %scope,
            cached = scope.is_cached(),
            replaced = replaced.is_some(),
            "Registered definition"
        );
        Ok(self)
    }
}

/// Boxes a typed definition into a [`DefinitionFn`].
fn erase<T, F>(definition: F) -> DefinitionFn
where
    T: 'static,
    F: Fn(&dyn Resolver) -> Result<T> + 'static,
{
    Rc::new(move |resolver: &dyn Resolver| Ok(Rc::new(definition(resolver)?) as Value))
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for Container {
    fn has(&self, id: &str) -> bool {
        Container::has(self, id)
    }

    fn resolve_any(&self, id: &str) -> Result<Value> {
        self.get_any(id)
    }

    fn contains_param(&self, key: &str) -> bool {
        Container::contains_param(self, key)
    }

    fn param_any(&self, key: &str) -> Result<Value> {
        Container::param_any(self, key)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("services", &self.services.len())
            .field("frozen_services", &self.services.frozen_len())
            .field("parameters", &self.parameters.len())
            .field("frozen_parameters", &self.parameters.frozen_len())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::Container;
    pub use crate::environment::{Environment, EnvironmentContainer};
    pub use crate::error::{PantryError, Result};
    pub use crate::provider::Provider;
    pub use crate::registry::{Resolver, Value};
    pub use crate::scope::Scope;
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
