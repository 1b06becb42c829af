//! Mediator between wire records and the cache store.
//!
//! Never talks to the network; it only owns the persisted-record shape.

use std::sync::Arc;

use citadel_core::models::{CharacterDetail, CharacterSummary, LocationDetail};
use citadel_core::types::EntityId;

use crate::models::{CharacterDetailRow, CharacterRow, LocationRow};
use crate::store::CacheStore;

/// Cache read/write/clear per entity kind, in wire-record terms.
///
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct CharacterRepository {
    store: Arc<dyn CacheStore>,
}

impl CharacterRepository {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub async fn cached_characters(&self) -> Result<Vec<CharacterSummary>, sqlx::Error> {
        let rows = self.store.all_summaries().await?;
        Ok(rows.into_iter().map(CharacterSummary::from).collect())
    }

    pub async fn cache_characters(&self, characters: &[CharacterSummary]) -> Result<(), sqlx::Error> {
        if characters.is_empty() {
            return Ok(());
        }
        let rows: Vec<CharacterRow> = characters.iter().map(CharacterRow::from).collect();
        self.store.upsert_summaries(&rows).await
    }

    /// Clear cached list entries only. Detail and location records are kept.
    pub async fn clear_cache(&self) -> Result<u64, sqlx::Error> {
        self.store.clear_summaries().await
    }

    pub async fn cached_character_detail(
        &self,
        id: EntityId,
    ) -> Result<Option<CharacterDetail>, sqlx::Error> {
        Ok(self.store.detail(id).await?.map(CharacterDetail::from))
    }

    pub async fn cache_character_detail(&self, detail: &CharacterDetail) -> Result<(), sqlx::Error> {
        self.store.upsert_detail(&CharacterDetailRow::from(detail)).await
    }

    pub async fn cached_location(&self, id: EntityId) -> Result<Option<LocationDetail>, sqlx::Error> {
        Ok(self.store.location(id).await?.map(LocationDetail::from))
    }

    pub async fn cache_location(&self, location: &LocationDetail) -> Result<(), sqlx::Error> {
        self.store.upsert_location(&LocationRow::from(location)).await
    }
}
