//! Local cache persistence for catalog records.
//!
//! - [`store::CacheStore`] is the record-store seam, with SQLite and
//!   in-memory backends.
//! - [`repository::CharacterRepository`] maps wire records onto the
//!   persisted rows and back.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub mod models;
pub mod repositories;
pub mod repository;
pub mod store;

pub use repository::CharacterRepository;
pub use store::{CacheStore, MemoryCacheStore, SqliteCacheStore};

pub type DbPool = sqlx::SqlitePool;

/// Create a connection pool from a database URL such as `sqlite://citadel.db`.
///
/// The database file is created when missing.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Create a private in-memory database.
///
/// Pinned to a single connection that never expires, since every SQLite
/// memory connection is its own database.
pub async fn memory_pool() -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Round-trip a trivial query to confirm the pool is usable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}
