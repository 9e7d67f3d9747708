//! Runtime cycle detection.
//!
//! Definitions may call back into the container while they run, so the
//! dependency graph only exists implicitly. [`ResolutionStack`] records
//! the keys currently being resolved and refuses to enter one twice.

use std::cell::RefCell;

use tracing::warn;

use crate::error::{CircularDependencyError, PantryError, Result};

/// Keys currently being resolved, outermost first.
#[derive(Debug, Default)]
pub(crate) struct ResolutionStack {
    path: RefCell<Vec<String>>,
}

impl ResolutionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `key` onto the stack.
    ///
    /// The returned guard pops it again when dropped, so the stack is
    /// unwound on error returns as well.
    ///
    /// # Errors
    /// [`PantryError::CircularDependency`] if `key` is already being
    /// resolved.
    pub fn enter(&self, key: &str) -> Result<ResolutionGuard<'_>> {
        let mut path = self.path.borrow_mut();

        if let Some(cycle_start) = path.iter().position(|k| k == key) {
            let mut chain: Vec<String> = path[cycle_start..].to_vec();
            chain.push(key.to_string());

            warn!(cycle = ?chain, "Circular dependency detected!");

            return Err(PantryError::CircularDependency(
                CircularDependencyError { chain },
            ));
        }

        path.push(key.to_string());
        Ok(ResolutionGuard { stack: self })
    }

    pub fn depth(&self) -> usize {
        self.path.borrow().len()
    }
}

/// Pops its key from the [`ResolutionStack`] on drop.
#[must_use]
pub(crate) struct ResolutionGuard<'a> {
    stack: &'a ResolutionStack,
}

impl Drop for ResolutionGuard<'_> {
    fn drop(&mut self) {
        self.stack.path.borrow_mut().pop();
    }
}
