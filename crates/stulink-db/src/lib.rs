//! # Stulink DB
//!
//! PostgreSQL pool construction, embedded migrations and error helpers.
//!
//! The pool is created once at startup and handed to every service call as
//! `&PgPool`; there is no global handle.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
//!
//! # Example
//!
//! ```ignore
//! use stulink_db::{DatabaseConfig, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
//! run_migrations(&pool).await?;
//! ```

use std::env;

use sqlx::postgres::PgPoolOptions;
use sqlx::migrate::{MigrateError, Migrator};

pub use sqlx::PgPool;

/// Migrations under the workspace `migrations/` directory, embedded at
/// compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            url: env::var("DATABASE_URL")?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        })
    }
}

/// Opens a connection pool against `config.url`.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
}

/// Applies any pending migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Returns true when `err` is a unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}
