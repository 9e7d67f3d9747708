//! Error types for Pantry container operations.
//!
//! Two failure modes are part of the container contract:
//! [`PantryError::NotFound`] for reads of absent keys and
//! [`PantryError::Frozen`] for writes to keys that were already observed.
//! The remaining variants come from resolution itself.

use std::fmt;

use pantry_support::rendering::render_chain;

/// Main error type for all Pantry operations.
#[derive(Debug, thiserror::Error)]
pub enum PantryError {
    /// Requested service or parameter does not exist.
    #[error("{}", .0)]
    NotFound(NotFoundError),

    /// Write or extend attempt on a key that was already read.
    #[error("{}", .0)]
    Frozen(FrozenError),

    /// A definition (transitively) requested itself.
    #[error("{}", .0)]
    CircularDependency(CircularDependencyError),

    /// A typed read asked for a type the stored value does not have.
    #[error("Type mismatch for \"{key}\": expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
    },

    /// Definition returned its own error during construction.
    #[error("Failed to construct \"{key}\": {source}")]
    ConstructionFailed {
        key: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl PantryError {
    /// Wraps an arbitrary error raised inside a definition.
    pub fn construction(
        key: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        PantryError::ConstructionFailed {
            key: key.into(),
            source: source.into(),
        }
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, PantryError::NotFound(_))
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        matches!(self, PantryError::Frozen(_))
    }

    /// The key this error is about, if it concerns a single key.
    pub fn key(&self) -> Option<&str> {
        match self {
            PantryError::NotFound(e) => Some(&e.key),
            PantryError::Frozen(e) => Some(&e.key),
            PantryError::TypeMismatch { key, .. } => Some(key),
            PantryError::ConstructionFailed { key, .. } => Some(key),
            PantryError::CircularDependency(_) => None,
        }
    }
}

/// Which store an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Service,
    Parameter,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Service => write!(f, "service"),
            EntryKind::Parameter => write!(f, "parameter"),
        }
    }
}

/// The write that was rejected by a [`FrozenError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Override,
    Extend,
}

/// Error when a key is not registered.
#[derive(Debug)]
pub struct NotFoundError {
    pub kind: EntryKind,
    pub key: String,
    /// Similar keys that ARE registered
    pub suggestions: Vec<String>,
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EntryKind::Service => {
                write!(f, "Service definition \"{}\" is not defined.", self.key)?
            }
            EntryKind::Parameter => write!(f, "Parameter \"{}\" is not defined.", self.key)?,
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        match self.kind {
            EntryKind::Service => write!(
                f,
                "\n  Hint: Register it with .set(\"{}\", ..) or .set_builder(\"{}\", ..)",
                self.key, self.key
            ),
            EntryKind::Parameter => write!(
                f,
                "\n  Hint: Store it with .set_param(\"{}\", ..)",
                self.key
            ),
        }
    }
}

/// Error when a key was already observed and can no longer change.
#[derive(Debug)]
pub struct FrozenError {
    pub kind: EntryKind,
    pub key: String,
    pub operation: Operation,
}

impl fmt::Display for FrozenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.operation) {
            (EntryKind::Service, Operation::Override) => {
                write!(f, "Cannot override frozen definition \"{}\".", self.key)?
            }
            (EntryKind::Service, Operation::Extend) => {
                write!(f, "Cannot extend frozen definition \"{}\".", self.key)?
            }
            (EntryKind::Parameter, _) => {
                write!(f, "Cannot override frozen parameter \"{}\".", self.key)?
            }
        }

        write!(
            f,
            "\n  Hint: \"{}\" was already read; remove it before redefining",
            self.key
        )
    }
}

/// Error when resolution re-enters a key that is still being resolved.
///
/// Shows the full chain so you can see WHERE the cycle is.
#[derive(Debug)]
pub struct CircularDependencyError {
    /// Example: ["a", "b", "a"]
    pub chain: Vec<String>,
}

impl fmt::Display for CircularDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Circular dependency detected:\n  {}", render_chain(&self.chain))?;
        write!(
            f,
            "\n  Hint: Break the cycle by reading one side lazily or through a parameter"
        )
    }
}

/// Convenient Result type for Pantry operations.
pub type Result<T> = std::result::Result<T, PantryError>;
