//! Row model for the `characters` table.

use citadel_core::models::CharacterSummary;
use citadel_core::types::EntityId;
use sqlx::FromRow;

/// A cached list entry.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CharacterRow {
    pub id: EntityId,
    pub name: String,
    pub species: String,
    pub status: String,
    pub gender: String,
    pub image: String,
}

impl From<&CharacterSummary> for CharacterRow {
    fn from(c: &CharacterSummary) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            species: c.species.clone(),
            status: c.status.clone(),
            gender: c.gender.clone(),
            image: c.image.clone(),
        }
    }
}

impl From<CharacterRow> for CharacterSummary {
    fn from(row: CharacterRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            species: row.species,
            status: row.status,
            gender: row.gender,
            image: row.image,
        }
    }
}
