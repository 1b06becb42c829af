//! Repository for the `location_details` table.

use citadel_core::types::EntityId;
use sqlx::SqlitePool;

use crate::models::LocationRow;

const COLUMNS: &str = "id, name, kind, dimension, resident_urls, url, created";

pub struct LocationRepo;

impl LocationRepo {
    pub async fn find_by_id(
        pool: &SqlitePool,
        id: EntityId,
    ) -> Result<Option<LocationRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM location_details WHERE id = ?1");
        sqlx::query_as::<_, LocationRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn upsert(pool: &SqlitePool, row: &LocationRow) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO location_details (id, name, kind, dimension, resident_urls, url, created)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                kind = excluded.kind,
                dimension = excluded.dimension,
                resident_urls = excluded.resident_urls,
                url = excluded.url,
                created = excluded.created",
        )
        .bind(row.id)
        .bind(&row.name)
        .bind(&row.kind)
        .bind(&row.dimension)
        .bind(&row.resident_urls)
        .bind(&row.url)
        .bind(&row.created)
        .execute(pool)
        .await?;
        Ok(())
    }
}
