//! Row model for the `location_details` table.

use citadel_core::codec::{decode_list, encode_list};
use citadel_core::models::LocationDetail;
use citadel_core::types::EntityId;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct LocationRow {
    pub id: EntityId,
    pub name: String,
    pub kind: String,
    pub dimension: String,
    /// Comma-joined resident URLs.
    pub resident_urls: String,
    pub url: String,
    pub created: String,
}

impl From<&LocationDetail> for LocationRow {
    fn from(l: &LocationDetail) -> Self {
        Self {
            id: l.id,
            name: l.name.clone(),
            kind: l.kind.clone(),
            dimension: l.dimension.clone(),
            resident_urls: encode_list(&l.residents),
            url: l.url.clone(),
            created: l.created.clone(),
        }
    }
}

impl From<LocationRow> for LocationDetail {
    fn from(row: LocationRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            kind: row.kind,
            dimension: row.dimension,
            residents: decode_list(&row.resident_urls),
            url: row.url,
            created: row.created,
        }
    }
}
