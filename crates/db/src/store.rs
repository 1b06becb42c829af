//! The local record store behind the repository.
//!
//! [`CacheStore`] speaks in persisted rows. Reads of missing records return
//! `None` or an empty list; errors only come from the storage engine itself.

use std::collections::BTreeMap;

use async_trait::async_trait;
use citadel_core::types::EntityId;
use tokio::sync::RwLock;

use crate::models::{CharacterDetailRow, CharacterRow, LocationRow};
use crate::repositories::{CharacterDetailRepo, CharacterRepo, LocationRepo};
use crate::DbPool;

/// Keyed record store with replace-on-id upserts.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn upsert_summaries(&self, rows: &[CharacterRow]) -> Result<(), sqlx::Error>;

    async fn all_summaries(&self) -> Result<Vec<CharacterRow>, sqlx::Error>;

    /// Remove every summary. Returns how many were removed.
    async fn clear_summaries(&self) -> Result<u64, sqlx::Error>;

    async fn detail(&self, id: EntityId) -> Result<Option<CharacterDetailRow>, sqlx::Error>;

    async fn upsert_detail(&self, row: &CharacterDetailRow) -> Result<(), sqlx::Error>;

    async fn location(&self, id: EntityId) -> Result<Option<LocationRow>, sqlx::Error>;

    async fn upsert_location(&self, row: &LocationRow) -> Result<(), sqlx::Error>;
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

/// [`CacheStore`] over a SQLite pool with the embedded schema applied.
#[derive(Clone)]
pub struct SqliteCacheStore {
    pool: DbPool,
}

impl SqliteCacheStore {
    /// Wrap a pool. The caller is responsible for running migrations.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `database_url` and migrate it.
    pub async fn open(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = crate::create_pool(database_url).await?;
        crate::run_migrations(&pool).await?;
        tracing::debug!(database_url, "Cache database ready");
        Ok(Self::new(pool))
    }

    /// A migrated private in-memory database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let pool = crate::memory_pool().await?;
        crate::run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl CacheStore for SqliteCacheStore {
    async fn upsert_summaries(&self, rows: &[CharacterRow]) -> Result<(), sqlx::Error> {
        CharacterRepo::upsert_many(&self.pool, rows).await
    }

    async fn all_summaries(&self) -> Result<Vec<CharacterRow>, sqlx::Error> {
        CharacterRepo::list(&self.pool).await
    }

    async fn clear_summaries(&self) -> Result<u64, sqlx::Error> {
        CharacterRepo::clear(&self.pool).await
    }

    async fn detail(&self, id: EntityId) -> Result<Option<CharacterDetailRow>, sqlx::Error> {
        CharacterDetailRepo::find_by_id(&self.pool, id).await
    }

    async fn upsert_detail(&self, row: &CharacterDetailRow) -> Result<(), sqlx::Error> {
        CharacterDetailRepo::upsert(&self.pool, row).await
    }

    async fn location(&self, id: EntityId) -> Result<Option<LocationRow>, sqlx::Error> {
        LocationRepo::find_by_id(&self.pool, id).await
    }

    async fn upsert_location(&self, row: &LocationRow) -> Result<(), sqlx::Error> {
        LocationRepo::upsert(&self.pool, row).await
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Process-local [`CacheStore`]; contents are lost when dropped.
#[derive(Default)]
pub struct MemoryCacheStore {
    summaries: RwLock<BTreeMap<EntityId, CharacterRow>>,
    details: RwLock<BTreeMap<EntityId, CharacterDetailRow>>,
    locations: RwLock<BTreeMap<EntityId, LocationRow>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn upsert_summaries(&self, rows: &[CharacterRow]) -> Result<(), sqlx::Error> {
        let mut summaries = self.summaries.write().await;
        for row in rows {
            summaries.insert(row.id, row.clone());
        }
        Ok(())
    }

    async fn all_summaries(&self) -> Result<Vec<CharacterRow>, sqlx::Error> {
        Ok(self.summaries.read().await.values().cloned().collect())
    }

    async fn clear_summaries(&self) -> Result<u64, sqlx::Error> {
        let mut summaries = self.summaries.write().await;
        let removed = summaries.len() as u64;
        summaries.clear();
        Ok(removed)
    }

    async fn detail(&self, id: EntityId) -> Result<Option<CharacterDetailRow>, sqlx::Error> {
        Ok(self.details.read().await.get(&id).cloned())
    }

    async fn upsert_detail(&self, row: &CharacterDetailRow) -> Result<(), sqlx::Error> {
        self.details.write().await.insert(row.id, row.clone());
        Ok(())
    }

    async fn location(&self, id: EntityId) -> Result<Option<LocationRow>, sqlx::Error> {
        Ok(self.locations.read().await.get(&id).cloned())
    }

    async fn upsert_location(&self, row: &LocationRow) -> Result<(), sqlx::Error> {
        self.locations.write().await.insert(row.id, row.clone());
        Ok(())
    }
}
