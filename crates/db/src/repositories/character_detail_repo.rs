//! Repository for the `character_details` table.

use citadel_core::types::EntityId;
use sqlx::SqlitePool;

use crate::models::CharacterDetailRow;

const COLUMNS: &str = "id, name, species, status, gender, image, kind, \
     origin_name, origin_url, location_name, location_url, episode_urls";

pub struct CharacterDetailRepo;

impl CharacterDetailRepo {
    pub async fn find_by_id(
        pool: &SqlitePool,
        id: EntityId,
    ) -> Result<Option<CharacterDetailRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM character_details WHERE id = ?1");
        sqlx::query_as::<_, CharacterDetailRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or wholly replace the row with the same id.
    pub async fn upsert(pool: &SqlitePool, row: &CharacterDetailRow) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO character_details
                (id, name, species, status, gender, image, kind,
                 origin_name, origin_url, location_name, location_url, episode_urls)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                species = excluded.species,
                status = excluded.status,
                gender = excluded.gender,
                image = excluded.image,
                kind = excluded.kind,
                origin_name = excluded.origin_name,
                origin_url = excluded.origin_url,
                location_name = excluded.location_name,
                location_url = excluded.location_url,
                episode_urls = excluded.episode_urls",
        )
        .bind(row.id)
        .bind(&row.name)
        .bind(&row.species)
        .bind(&row.status)
        .bind(&row.gender)
        .bind(&row.image)
        .bind(&row.kind)
        .bind(&row.origin_name)
        .bind(&row.origin_url)
        .bind(&row.location_name)
        .bind(&row.location_url)
        .bind(&row.episode_urls)
        .execute(pool)
        .await?;
        Ok(())
    }
}
