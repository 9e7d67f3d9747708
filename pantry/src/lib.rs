//! # Pantry — string-keyed dependency injection for Rust
//!
//! A small IoC container in the spirit of Pimple: services are lazy
//! definitions looked up by name, parameters are plain values, and any
//! key that has been read is frozen against further changes.
//!
//! ```rust
//! use pantry::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let mut container = EnvironmentContainer::default();
//! container
//!     .set_param("greeting", "hello")?
//!     .set_param("greeting_dev", "hello from dev")?
//!     .set_builder("message", |r| Ok(r.param::<&str>("greeting")?.to_uppercase()))?;
//!
//! assert_eq!(*container.get::<String>("message")?, "HELLO FROM DEV");
//! # Ok(())
//! # }
//! ```

pub use pantry_container::*;
pub use pantry_support::*;
