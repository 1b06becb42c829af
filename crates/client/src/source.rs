//! The remote data source seam.

use async_trait::async_trait;
use citadel_core::models::{CharacterDetail, CharacterPage, LocationDetail};
use citadel_core::types::{EntityId, PageNumber};

use crate::api::{ApiError, CatalogApi, PageFilters};

/// Read access to the remote catalog.
///
/// Implemented by [`CatalogApi`]; tests substitute in-process doubles.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch_character_page(
        &self,
        page: PageNumber,
        filters: Option<&PageFilters>,
        name: Option<&str>,
    ) -> Result<CharacterPage, ApiError>;

    async fn fetch_character(&self, id: EntityId) -> Result<CharacterDetail, ApiError>;

    async fn fetch_location(&self, id: EntityId) -> Result<LocationDetail, ApiError>;
}

#[async_trait]
impl RemoteSource for CatalogApi {
    async fn fetch_character_page(
        &self,
        page: PageNumber,
        filters: Option<&PageFilters>,
        name: Option<&str>,
    ) -> Result<CharacterPage, ApiError> {
        CatalogApi::fetch_character_page(self, page, filters, name).await
    }

    async fn fetch_character(&self, id: EntityId) -> Result<CharacterDetail, ApiError> {
        CatalogApi::fetch_character(self, id).await
    }

    async fn fetch_location(&self, id: EntityId) -> Result<LocationDetail, ApiError> {
        CatalogApi::fetch_location(self, id).await
    }
}
