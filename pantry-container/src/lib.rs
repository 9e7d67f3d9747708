//! Core container implementation for Pantry DI.

pub mod container;
pub mod environment;
pub mod error;
pub mod provider;
pub mod registry;
mod resolution;
pub mod scope;

pub use container::{Container, prelude};
pub use environment::{Environment, EnvironmentContainer};
pub use error::{PantryError, Result};
pub use provider::Provider;
pub use registry::{Resolver, Value};
pub use scope::Scope;
