//! Environment-aware container.
//!
//! [`EnvironmentContainer`] wraps a [`Container`] and redirects reads
//! to suffixed override keys when they exist. With the default
//! [`Environment`], `get("mailer")` resolves `"mailerDev"` if that is
//! registered, and `param("db.dsn")` reads `"db.dsn_dev"` if that is
//! stored.
//!
//! Only reads are redirected. Overrides are registered under their own
//! suffixed keys with the regular [`Container`] methods.

use std::borrow::Cow;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::container::Container;
use crate::error::Result;
use crate::registry::{Resolver, Value, downcast};

/// Suffixes that select override keys.
///
/// # Examples
/// ```
/// use pantry_container::environment::Environment;
///
/// let env = Environment::default();
/// assert_eq!(env.service_suffix(), "Dev");
/// assert_eq!(env.parameter_suffix(), "_dev");
///
/// let test = Environment::new("Test", "_test");
/// assert_eq!(test.service_suffix(), "Test");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    service_suffix: String,
    parameter_suffix: String,
}

impl Environment {
    pub const DEFAULT_SERVICE_SUFFIX: &'static str = "Dev";
    pub const DEFAULT_PARAMETER_SUFFIX: &'static str = "_dev";

    pub fn new(service_suffix: impl Into<String>, parameter_suffix: impl Into<String>) -> Self {
        Self {
            service_suffix: service_suffix.into(),
            parameter_suffix: parameter_suffix.into(),
        }
    }

    pub fn with_service_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.service_suffix = suffix.into();
        self
    }

    pub fn with_parameter_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.parameter_suffix = suffix.into();
        self
    }

    #[inline]
    pub fn service_suffix(&self) -> &str {
        &self.service_suffix
    }

    #[inline]
    pub fn parameter_suffix(&self) -> &str {
        &self.parameter_suffix
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SERVICE_SUFFIX, Self::DEFAULT_PARAMETER_SUFFIX)
    }
}

/// A [`Container`] that prefers suffixed overrides on read.
///
/// Derefs to the wrapped container for everything that is not
/// redirected: registration, removal, `has` and `contains_param`.
/// Definitions resolved through it receive it as their [`Resolver`],
/// so their own lookups are redirected as well.
pub struct EnvironmentContainer {
    inner: Container,
    environment: Environment,
}

impl EnvironmentContainer {
    /// Creates an empty container for `environment`.
    pub fn new(environment: Environment) -> Self {
        Self::with_container(Container::new(), environment)
    }

    /// Wraps an existing container.
    pub fn with_container(inner: Container, environment: Environment) -> Self {
        Self { inner, environment }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Unwraps the base container. Frozen state is kept.
    pub fn into_inner(self) -> Container {
        self.inner
    }

    /// Resolves `id`, or its override if one is registered.
    pub fn get<T: 'static>(&self, id: &str) -> Result<Rc<T>> {
        downcast(id, self.get_any(id)?)
    }

    pub fn get_any(&self, id: &str) -> Result<Value> {
        let key = self.service_key(id);
        self.inner.resolve_with(&key, self)
    }

    /// Reads `key`, or its override if one is stored.
    pub fn param<T: 'static>(&self, key: &str) -> Result<Rc<T>> {
        downcast(key, self.param_any(key)?)
    }

    pub fn param_any(&self, key: &str) -> Result<Value> {
        self.inner.param_any(&self.param_key(key))
    }

    /// The key `get(id)` would resolve.
    pub fn service_key<'a>(&self, id: &'a str) -> Cow<'a, str> {
        let candidate = format!("{id}{}", self.environment.service_suffix);
        if self.inner.has(&candidate) {
            trace!(from = id, to = %candidate, "Using service override");
            Cow::Owned(candidate)
        } else {
            Cow::Borrowed(id)
        }
    }

    /// The key `param(key)` would read.
    pub fn param_key<'a>(&self, key: &'a str) -> Cow<'a, str> {
        let candidate = format!("{key}{}", self.environment.parameter_suffix);
        if self.inner.contains_param(&candidate) {
            trace!(from = key, to = %candidate, "Using parameter override");
            Cow::Owned(candidate)
        } else {
            Cow::Borrowed(key)
        }
    }
}

impl Default for EnvironmentContainer {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}

impl Deref for EnvironmentContainer {
    type Target = Container;

    fn deref(&self) -> &Container {
        &self.inner
    }
}

impl DerefMut for EnvironmentContainer {
    fn deref_mut(&mut self) -> &mut Container {
        &mut self.inner
    }
}

impl Resolver for EnvironmentContainer {
    fn has(&self, id: &str) -> bool {
        self.inner.has(id)
    }

    fn resolve_any(&self, id: &str) -> Result<Value> {
        self.get_any(id)
    }

    fn contains_param(&self, key: &str) -> bool {
        self.inner.contains_param(key)
    }

    fn param_any(&self, key: &str) -> Result<Value> {
        EnvironmentContainer::param_any(self, key)
    }
}

impl fmt::Debug for EnvironmentContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentContainer")
            .field("environment", &self.environment)
            .field("inner", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PantryError;

    struct Service {
        flavour: &'static str,
    }

    fn dev_container() -> EnvironmentContainer {
        let mut container = EnvironmentContainer::default();
        container
            .set("component", |_| Ok(String::from("#")))
            .unwrap();
        container
    }

    #[test]
    fn prefers_dev_service() {
        let mut container = dev_container();
        container
            .set("commonService", |_| Ok(Service { flavour: "prod" }))
            .unwrap()
            .set("commonServiceDev", |_| Ok(Service { flavour: "dev" }))
            .unwrap();

        let service = container.get::<Service>("commonService").unwrap();
        assert_eq!(service.flavour, "dev");

        // the redirected key is the one that froze
        assert!(container.is_frozen("commonServiceDev"));
        assert!(!container.is_frozen("commonService"));
    }

    #[test]
    fn falls_back_without_override() {
        let mut container = dev_container();
        container
            .set("commonService", |_| Ok(Service { flavour: "prod" }))
            .unwrap();

        assert_eq!(container.get::<Service>("commonService").unwrap().flavour, "prod");
        assert!(container.is_frozen("commonService"));
    }

    #[test]
    fn override_is_cached_like_any_singleton() {
        let mut container = dev_container();
        container
            .set("svc", |_| Ok(Service { flavour: "prod" }))
            .unwrap()
            .set("svcDev", |_| Ok(Service { flavour: "dev" }))
            .unwrap();

        let a = container.get::<Service>("svc").unwrap();
        let b = container.get::<Service>("svcDev").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn nested_lookups_are_redirected() {
        let mut container = dev_container();
        container
            .set("componentDev", |_| Ok(String::from("dev#")))
            .unwrap()
            .set("commonService", |r| Ok(format!("{}value", r.get::<String>("component")?)))
            .unwrap();

        assert_eq!(*container.get::<String>("commonService").unwrap(), "dev#value");
    }

    #[test]
    fn prefers_dev_parameter() {
        let mut container = dev_container();
        container
            .set_param("param.test_value", "value")
            .unwrap()
            .set_param("param.test_value_dev", "dev value")
            .unwrap();

        assert_eq!(*container.param::<&str>("param.test_value").unwrap(), "dev value");
        assert!(container.is_param_frozen("param.test_value_dev"));
        // base key is still writable
        assert!(container.set_param("param.test_value", "other").is_ok());
    }

    #[test]
    fn writes_and_checks_are_not_redirected() {
        let mut container = dev_container();
        container.set_param("p_dev", 1u8).unwrap();

        assert!(!container.contains_param("p"));
        assert!(container.param::<u8>("p").is_ok());
        assert!(!container.has("componentDev"));
        assert!(container.has("component"));
    }

    #[test]
    fn missing_reports_original_key() {
        let container = dev_container();
        match container.get::<Service>("missing") {
            Err(PantryError::NotFound(e)) => assert_eq!(e.key, "missing"),
            Err(other) => panic!("Expected NotFound, got: {other:?}"),
            Ok(_) => panic!("Expected NotFound, got a service"),
        }
        assert!(container.param::<u8>("p.missing").err().unwrap().is_not_found());
    }

    #[test]
    fn custom_suffixes() {
        let mut container = EnvironmentContainer::new(Environment::new("Test", ".test"));
        container
            .set("clock", |_| Ok(0u64))
            .unwrap()
            .set("clockTest", |_| Ok(42u64))
            .unwrap()
            .set("clockDev", |_| Ok(7u64))
            .unwrap()
            .set_param("tz", "UTC")
            .unwrap()
            .set_param("tz.test", "Europe/Tallinn")
            .unwrap();

        assert_eq!(*container.get::<u64>("clock").unwrap(), 42);
        assert_eq!(*container.param::<&str>("tz").unwrap(), "Europe/Tallinn");
        assert_eq!(container.service_key("clock"), "clockTest");
        assert_eq!(container.param_key("none"), "none");
    }

    #[test]
    fn wraps_existing_container() {
        let mut base = Container::new();
        base.set("svc", |_| Ok(1u8)).unwrap().set("svcDev", |_| Ok(2u8)).unwrap();

        let container = EnvironmentContainer::with_container(base, Environment::default());
        assert_eq!(*container.get::<u8>("svc").unwrap(), 2);

        let base = container.into_inner();
        assert!(base.is_frozen("svcDev"));
        assert_eq!(*base.get::<u8>("svc").unwrap(), 1);
    }

    #[test]
    fn environment_deserializes_with_defaults() {
        let env: Environment =
            serde_json::from_str(r#"{ "service_suffix": "Local" }"#).unwrap();
        assert_eq!(env.service_suffix(), "Local");
        assert_eq!(env.parameter_suffix(), "_dev");

        let env = Environment::default()
            .with_service_suffix("Stage")
            .with_parameter_suffix("_stage");
        let json = serde_json::to_string(&env).unwrap();
        let back: Environment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, env);
    }

    #[test]
    fn debug_shows_suffixes() {
        let debug = format!("{:?}", dev_container());
        assert!(debug.contains("EnvironmentContainer"));
        assert!(debug.contains("\"Dev\""));
        assert!(debug.contains("services: 1"));
    }
}
