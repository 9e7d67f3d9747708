//! Provider trait — a module of related registrations.
//!
//! Providers group related services and parameters together, similar
//! to Laravel's ServiceProvider or Pimple's ServiceProviderInterface.
//!
//! # Examples
//! ```rust
//! use pantry_container::prelude::*;
//!
//! struct MailProvider;
//!
//! impl Provider for MailProvider {
//!     fn register(&self, container: &mut Container) -> Result<()> {
//!         container
//!             .set_param("mail.host", String::from("localhost"))?
//!             .set("mailer", |r| Ok(format!("smtp://{}", r.param::<String>("mail.host")?)))?;
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let mut container = Container::new();
//! container.register_provider(&MailProvider)?;
//! assert_eq!(*container.get::<String>("mailer")?, "smtp://localhost");
//! # Ok(())
//! # }
//! ```

use crate::container::Container;
use crate::error::Result;

/// A module that registers related definitions into a container.
///
/// Split registrations by domain instead of one giant block:
///
/// ```rust,ignore
/// container
///     .register_provider(&DatabaseProvider)?
///     .register_provider(&MailProvider)?;
/// ```
pub trait Provider {
    /// Register definitions and parameters.
    ///
    /// Errors (typically `Frozen`) abort the registration and are
    /// returned by [`Container::register_provider`].
    fn register(&self, container: &mut Container) -> Result<()>;

    /// Optional: human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PantryError;

    struct DatabaseProvider {
        dsn: &'static str,
    }

    impl Provider for DatabaseProvider {
        fn register(&self, container: &mut Container) -> Result<()> {
            container
                .set_param("db.dsn", self.dsn)?
                .set("db", |r| Ok(format!("connected to {}", r.param::<&str>("db.dsn")?)))?;
            Ok(())
        }
    }

    #[test]
    fn provider_registers_definitions() {
        let mut container = Container::new();
        container
            .register_provider(&DatabaseProvider { dsn: "sqlite::memory:" })
            .unwrap();

        assert!(container.has("db"));
        assert!(container.contains_param("db.dsn"));
        assert_eq!(*container.get::<String>("db").unwrap(), "connected to sqlite::memory:");
    }

    #[test]
    fn provider_errors_propagate() {
        let mut container = Container::new();
        let provider = DatabaseProvider { dsn: "a" };
        container.register_provider(&provider).unwrap();
        let _ = container.get_any("db").unwrap();

        // second run hits the frozen parameter first
        let err = container.register_provider(&provider).err().unwrap();
        assert!(matches!(err, PantryError::Frozen(_)));
    }

    #[test]
    fn provider_has_name() {
        let provider = DatabaseProvider { dsn: "" };
        assert!(provider.name().contains("DatabaseProvider"));
    }
}
