//! Character and location lookups for the detail screens.
//!
//! Connectivity is checked on every call. When online the record is fetched
//! and cached; a transport failure falls back to the cached copy if one
//! exists. When offline only the cache is consulted, and a miss is
//! [`CoreError::NoDataAvailable`].

use std::sync::Arc;

use citadel_client::{ConnectivityProbe, RemoteSource};
use citadel_core::error::CoreError;
use citadel_core::models::{CharacterDetail, LocationDetail};
use citadel_core::types::EntityId;
use citadel_db::CharacterRepository;
use citadel_events::{kinds, CatalogEvent, EventBus};
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::error::SyncError;

/// Upper bound on resident lookups running at once.
pub const RESIDENT_CONCURRENCY: usize = 8;

/// Where a served record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Network,
    Cache,
}

/// A record together with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served<T> {
    pub value: T,
    pub source: DataSource,
}

/// A resident of a location; `character` is `None` when it could not be
/// loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidentPreview {
    pub id: EntityId,
    pub character: Option<CharacterDetail>,
}

/// Cache-or-network access for detail and location views.
#[derive(Clone)]
pub struct DetailService {
    remote: Arc<dyn RemoteSource>,
    repository: CharacterRepository,
    connectivity: Arc<dyn ConnectivityProbe>,
    events: Arc<EventBus>,
}

impl DetailService {
    pub fn new(
        remote: Arc<dyn RemoteSource>,
        repository: CharacterRepository,
        connectivity: Arc<dyn ConnectivityProbe>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            remote,
            repository,
            connectivity,
            events,
        }
    }

    /// Load one character for the detail view.
    pub async fn character(&self, id: EntityId) -> Result<Served<CharacterDetail>, SyncError> {
        if self.connectivity.has_connectivity() {
            match self.remote.fetch_character(id).await {
                Ok(detail) => {
                    self.repository.cache_character_detail(&detail).await?;
                    return Ok(self.served(kinds::DETAIL_SERVED, id, detail, DataSource::Network));
                }
                Err(e) if e.is_transport() => {
                    tracing::warn!(id, error = %e, "Character fetch failed, trying cache");
                    return match self.repository.cached_character_detail(id).await? {
                        Some(detail) => {
                            Ok(self.served(kinds::DETAIL_SERVED, id, detail, DataSource::Cache))
                        }
                        None => Err(e.into()),
                    };
                }
                Err(e) => return Err(e.into()),
            }
        }

        match self.repository.cached_character_detail(id).await? {
            Some(detail) => Ok(self.served(kinds::DETAIL_SERVED, id, detail, DataSource::Cache)),
            None => Err(CoreError::NoDataAvailable {
                entity: "character",
                id,
            }
            .into()),
        }
    }

    /// Load one location for the location view.
    pub async fn location(&self, id: EntityId) -> Result<Served<LocationDetail>, SyncError> {
        if self.connectivity.has_connectivity() {
            match self.remote.fetch_location(id).await {
                Ok(location) => {
                    self.repository.cache_location(&location).await?;
                    return Ok(self.served(kinds::LOCATION_SERVED, id, location, DataSource::Network));
                }
                Err(e) if e.is_transport() => {
                    tracing::warn!(id, error = %e, "Location fetch failed, trying cache");
                    return match self.repository.cached_location(id).await? {
                        Some(location) => {
                            Ok(self.served(kinds::LOCATION_SERVED, id, location, DataSource::Cache))
                        }
                        None => Err(e.into()),
                    };
                }
                Err(e) => return Err(e.into()),
            }
        }

        match self.repository.cached_location(id).await? {
            Some(location) => {
                Ok(self.served(kinds::LOCATION_SERVED, id, location, DataSource::Cache))
            }
            None => Err(CoreError::NoDataAvailable {
                entity: "location",
                id,
            }
            .into()),
        }
    }

    /// Resolve every navigable resident of `location`, at most
    /// [`RESIDENT_CONCURRENCY`] at a time, in listing order.
    ///
    /// A resident that fails to load is returned without a character rather
    /// than failing the whole listing.
    pub async fn residents(&self, location: &LocationDetail) -> Vec<ResidentPreview> {
        stream::iter(location.resident_ids())
            .map(move |id| async move {
                let character = match self.character(id).await {
                    Ok(served) => Some(served.value),
                    Err(e) => {
                        tracing::debug!(id, error = %e, "Resident unavailable");
                        None
                    }
                };
                ResidentPreview { id, character }
            })
            .buffered(RESIDENT_CONCURRENCY)
            .collect::<Vec<_>>()
            .await
    }

    fn served<T>(&self, kind: &str, id: EntityId, value: T, source: DataSource) -> Served<T> {
        tracing::debug!(id, ?source, kind, "Record served");
        self.events.publish(
            CatalogEvent::new(kind)
                .with_entity(id)
                .with_payload(serde_json::json!({ "source": source })),
        );
        Served { value, source }
    }
}
