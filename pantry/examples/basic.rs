//! Basic example of the Pantry DI container.
//!
//! Run with `RUST_LOG=pantry_container=trace` to see resolution logs.

use std::rc::Rc;

use pantry::prelude::*;
use tracing_subscriber::EnvFilter;

// === Define your types ===

trait Logger {
    fn log(&self, msg: &str);
}

struct ConsoleLogger {
    prefix: String,
}

impl Logger for ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("{} {msg}", self.prefix);
    }
}

struct Database {
    url: String,
    logger: Rc<Box<dyn Logger>>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("Executing: {sql}"));
        format!("Results from {}", self.url)
    }
}

struct UserRepository {
    db: Rc<Database>,
}

impl UserRepository {
    fn find_user(&self, id: u64) -> String {
        self.db.query(&format!("SELECT * FROM users WHERE id = {id}"))
    }
}

struct AppProvider;

impl Provider for AppProvider {
    fn register(&self, container: &mut Container) -> Result<()> {
        container
            .set_param("db.url", String::from("postgres://localhost/app"))?
            .set_param("db.url_dev", String::from("sqlite::memory:"))?
            .set("logger", |_| {
                Ok(Box::new(ConsoleLogger { prefix: "[LOG]".into() }) as Box<dyn Logger>)
            })?
            .set("database", |r| {
                Ok(Database {
                    url: r.param::<String>("db.url")?.to_string(),
                    logger: r.get("logger")?,
                })
            })?
            .set_builder("users", |r| Ok(UserRepository { db: r.get("database")? }))?
            // Decorate the logger: announce it every time it is handed out
            .extend("logger", |logger: Rc<Box<dyn Logger>>, _| {
                logger.log("logger ready");
                Ok(logger)
            })?;
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pantry_container=debug")),
        )
        .init();

    let mut container = EnvironmentContainer::default();
    container.register_provider(&AppProvider)?;
    println!("{container:?}");

    let users = container.get::<UserRepository>("users")?;
    println!("{}", users.find_user(42));

    // Builders give a fresh repository, backed by the same database
    let again = container.get::<UserRepository>("users")?;
    println!("same database: {}", Rc::ptr_eq(&users.db, &again.db));

    // Everything that was read is frozen now
    if let Err(err) = container.set_param("db.url_dev", String::from("other")) {
        println!("{err}");
    }

    // Missing keys come with suggestions
    if let Err(err) = container.get_any("databse") {
        println!("{err}");
    }

    tracing::info!("done");
    Ok(())
}
