//! How a service definition was registered.
//!
//! - [`Scope::Singleton`]: built once, cached for the life of the registration
//! - [`Scope::Builder`]: built again on every `get`
use std::fmt;

/// Defines whether the container caches a service's value.
///
/// # Examples
/// ```
/// use pantry_container::scope::Scope;
///
/// assert!(Scope::Singleton.is_cached());
/// assert!(!Scope::Builder.is_cached());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One instance per registration.
    ///
    /// Created on first `get`, dropped when the definition is replaced
    /// or removed.
    ///
    /// # When to use
    /// - Database connection pools
    /// - Configuration objects
    /// - Shared caches
    Singleton,

    /// New instance created on every `get` call.
    ///
    /// # When to use
    /// - Objects with mutable state that shouldn't be shared
    /// - Cheap value objects
    Builder,
}

impl Scope {
    /// Returns `true` if this scope caches instances.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, Scope::Singleton)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Singleton => write!(f, "Singleton"),
            Scope::Builder => write!(f, "Builder"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_is_cached() {
        assert!(Scope::Singleton.is_cached());
        assert!(!Scope::Builder.is_cached());
    }

    #[test]
    fn scope_display() {
        assert_eq!(format!("{}", Scope::Singleton), "Singleton");
        assert_eq!(format!("{}", Scope::Builder), "Builder");
    }
}
