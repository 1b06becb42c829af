//! Wire records returned by the catalog API.
//!
//! Unknown JSON fields are ignored on decode so newer API revisions keep
//! deserializing into these shapes.

use serde::{Deserialize, Serialize};

use crate::refs::{episode_label, ref_id};
use crate::types::{EntityId, PageNumber};

/// A character as listed on a catalog page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSummary {
    pub id: EntityId,
    pub name: String,
    pub species: String,
    /// Free text, commonly `Alive`, `Dead` or `unknown`.
    pub status: String,
    pub gender: String,
    /// Avatar image URL.
    pub image: String,
}

/// A named link to another catalog resource.
///
/// The foreign id is only available as the last path segment of `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceRef {
    pub name: String,
    pub url: String,
}

impl PlaceRef {
    /// Navigable location id, if `url` ends in a numeric segment.
    pub fn id(&self) -> Option<EntityId> {
        ref_id(&self.url)
    }
}

/// Full character record from `GET /character/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterDetail {
    pub id: EntityId,
    pub name: String,
    pub species: String,
    pub status: String,
    pub gender: String,
    pub image: String,
    /// Sub-species or variant; often empty.
    #[serde(rename = "type", default)]
    pub kind: String,
    pub origin: PlaceRef,
    pub location: PlaceRef,
    /// Episode URLs in broadcast order.
    #[serde(default)]
    pub episode: Vec<String>,
}

impl CharacterDetail {
    pub fn summary(&self) -> CharacterSummary {
        CharacterSummary {
            id: self.id,
            name: self.name.clone(),
            species: self.species.clone(),
            status: self.status.clone(),
            gender: self.gender.clone(),
            image: self.image.clone(),
        }
    }

    pub fn origin_id(&self) -> Option<EntityId> {
        self.origin.id()
    }

    pub fn location_id(&self) -> Option<EntityId> {
        self.location.id()
    }

    /// Episode numbers where the URL carries one, the raw URL otherwise.
    pub fn episode_labels(&self) -> Vec<String> {
        self.episode.iter().map(|url| episode_label(url)).collect()
    }
}

/// Location record from `GET /location/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDetail {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub dimension: String,
    /// Character URLs of known residents.
    #[serde(default)]
    pub residents: Vec<String>,
    pub url: String,
    /// Opaque creation timestamp as sent by the API.
    pub created: String,
}

impl LocationDetail {
    /// Resident ids in listing order. Entries without a numeric suffix are skipped.
    pub fn resident_ids(&self) -> Vec<EntityId> {
        self.residents.iter().filter_map(|url| ref_id(url)).collect()
    }
}

/// Pagination bounds reported by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub count: u32,
    pub pages: PageNumber,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// One page of `GET /character`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterPage {
    pub info: PageInfo,
    pub results: Vec<CharacterSummary>,
}
