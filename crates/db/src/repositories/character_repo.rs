//! Repository for the `characters` table.

use sqlx::SqlitePool;

use crate::models::CharacterRow;

const COLUMNS: &str = "id, name, species, status, gender, image";

/// Bulk upsert, listing and clearing of cached list entries.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert or replace every row inside one transaction.
    pub async fn upsert_many(pool: &SqlitePool, rows: &[CharacterRow]) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for row in rows {
            sqlx::query(
                "INSERT INTO characters (id, name, species, status, gender, image)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    species = excluded.species,
                    status = excluded.status,
                    gender = excluded.gender,
                    image = excluded.image",
            )
            .bind(row.id)
            .bind(&row.name)
            .bind(&row.species)
            .bind(&row.status)
            .bind(&row.gender)
            .bind(&row.image)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await
    }

    /// All cached entries, ordered by id.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<CharacterRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters ORDER BY id ASC");
        sqlx::query_as::<_, CharacterRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Delete every cached entry. Returns the number of rows removed.
    pub async fn clear(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM characters").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
