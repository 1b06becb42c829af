//! Row model for the `character_details` table.

use citadel_core::codec::{decode_list, encode_list};
use citadel_core::models::{CharacterDetail, PlaceRef};
use citadel_core::types::EntityId;
use sqlx::FromRow;

/// A cached character detail with origin/location flattened into columns.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CharacterDetailRow {
    pub id: EntityId,
    pub name: String,
    pub species: String,
    pub status: String,
    pub gender: String,
    pub image: String,
    pub kind: String,
    pub origin_name: String,
    pub origin_url: String,
    pub location_name: String,
    pub location_url: String,
    /// Comma-joined episode URLs.
    pub episode_urls: String,
}

impl From<&CharacterDetail> for CharacterDetailRow {
    fn from(d: &CharacterDetail) -> Self {
        Self {
            id: d.id,
            name: d.name.clone(),
            species: d.species.clone(),
            status: d.status.clone(),
            gender: d.gender.clone(),
            image: d.image.clone(),
            kind: d.kind.clone(),
            origin_name: d.origin.name.clone(),
            origin_url: d.origin.url.clone(),
            location_name: d.location.name.clone(),
            location_url: d.location.url.clone(),
            episode_urls: encode_list(&d.episode),
        }
    }
}

impl From<CharacterDetailRow> for CharacterDetail {
    fn from(row: CharacterDetailRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            species: row.species,
            status: row.status,
            gender: row.gender,
            image: row.image,
            kind: row.kind,
            origin: PlaceRef {
                name: row.origin_name,
                url: row.origin_url,
            },
            location: PlaceRef {
                name: row.location_name,
                url: row.location_url,
            },
            episode: decode_list(&row.episode_urls),
        }
    }
}
