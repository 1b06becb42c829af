//! Shared doubles for the sync integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use citadel_client::{ApiError, PageFilters, RemoteSource};
use citadel_core::models::{
    CharacterDetail, CharacterPage, CharacterSummary, LocationDetail, PageInfo, PlaceRef,
};
use citadel_core::types::{EntityId, PageNumber};
use citadel_db::{CharacterRepository, MemoryCacheStore};

pub const PER_PAGE: usize = 3;

pub fn summary(id: EntityId, name: &str, status: &str, species: &str, gender: &str) -> CharacterSummary {
    CharacterSummary {
        id,
        name: name.to_string(),
        species: species.to_string(),
        status: status.to_string(),
        gender: gender.to_string(),
        image: format!("https://host/api/character/avatar/{id}.jpeg"),
    }
}

pub fn detail(id: EntityId, name: &str) -> CharacterDetail {
    CharacterDetail {
        id,
        name: name.to_string(),
        species: "Human".into(),
        status: "Alive".into(),
        gender: "Male".into(),
        image: format!("https://host/api/character/avatar/{id}.jpeg"),
        kind: String::new(),
        origin: PlaceRef {
            name: "Earth (C-137)".into(),
            url: "https://host/api/location/1".into(),
        },
        location: PlaceRef {
            name: "Citadel of Ricks".into(),
            url: "https://host/api/location/3".into(),
        },
        episode: vec!["https://host/api/episode/1".into()],
    }
}

pub fn location(id: EntityId, residents: &[EntityId]) -> LocationDetail {
    LocationDetail {
        id,
        name: "Citadel of Ricks".into(),
        kind: "Space station".into(),
        dimension: "unknown".into(),
        residents: residents
            .iter()
            .map(|r| format!("https://host/api/character/{r}"))
            .collect(),
        url: format!("https://host/api/location/{id}"),
        created: "2017-11-10T13:08:13.191Z".into(),
    }
}

/// Numbered characters split into pages of [`PER_PAGE`].
pub fn numbered(count: usize) -> Vec<CharacterSummary> {
    (1..=count as EntityId)
        .map(|id| summary(id, &format!("Character {id}"), "Alive", "Human", "Male"))
        .collect()
}

/// A `reqwest` connection failure, obtained by dialing a closed port.
pub async fn transport_error() -> ApiError {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let err = reqwest::get(format!("http://{addr}/")).await.unwrap_err();
    ApiError::Network(err)
}

#[derive(Default)]
struct Script {
    characters: Vec<CharacterSummary>,
    failing_pages: HashSet<PageNumber>,
    details: BTreeMap<EntityId, CharacterDetail>,
    locations: BTreeMap<EntityId, LocationDetail>,
    unreachable: bool,
    page_requests: Vec<(PageNumber, Option<String>)>,
    detail_requests: Vec<EntityId>,
    active_details: usize,
    peak_details: usize,
}

/// Scripted in-process catalog.
///
/// The list endpoint pages through `characters`, narrowed by the `name`
/// parameter the same way the real API does (case-insensitive substring).
#[derive(Clone, Default)]
pub struct FakeRemote {
    script: Arc<Mutex<Script>>,
}

impl FakeRemote {
    pub fn with_characters(characters: Vec<CharacterSummary>) -> Self {
        let remote = Self::default();
        remote.script.lock().unwrap().characters = characters;
        remote
    }

    pub fn fail_page(&self, page: PageNumber) {
        self.script.lock().unwrap().failing_pages.insert(page);
    }

    pub fn heal_page(&self, page: PageNumber) {
        self.script.lock().unwrap().failing_pages.remove(&page);
    }

    pub fn add_detail(&self, detail: CharacterDetail) {
        self.script.lock().unwrap().details.insert(detail.id, detail);
    }

    pub fn add_location(&self, location: LocationDetail) {
        self.script.lock().unwrap().locations.insert(location.id, location);
    }

    /// Make every detail and location request fail at the transport level.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.script.lock().unwrap().unreachable = unreachable;
    }

    pub fn page_requests(&self) -> Vec<(PageNumber, Option<String>)> {
        self.script.lock().unwrap().page_requests.clone()
    }

    pub fn detail_requests(&self) -> Vec<EntityId> {
        self.script.lock().unwrap().detail_requests.clone()
    }

    /// Most character lookups that were ever running at the same time.
    pub fn peak_detail_requests(&self) -> usize {
        self.script.lock().unwrap().peak_details
    }
}

#[async_trait]
impl RemoteSource for FakeRemote {
    async fn fetch_character_page(
        &self,
        page: PageNumber,
        _filters: Option<&PageFilters>,
        name: Option<&str>,
    ) -> Result<CharacterPage, ApiError> {
        let (matching, failing) = {
            let mut script = self.script.lock().unwrap();
            script
                .page_requests
                .push((page, name.map(str::to_string)));
            let needle = name.unwrap_or_default().to_lowercase();
            let matching: Vec<CharacterSummary> = script
                .characters
                .iter()
                .filter(|c| c.name.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            (matching, script.failing_pages.contains(&page))
        };

        if failing {
            return Err(ApiError::Status {
                status: 503,
                body: "unavailable".into(),
            });
        }
        if matching.is_empty() {
            return Err(ApiError::NotFound {
                entity: "character page",
                id: i64::from(page),
            });
        }

        let pages = matching.len().div_ceil(PER_PAGE) as PageNumber;
        let results = matching
            .chunks(PER_PAGE)
            .nth(page as usize - 1)
            .map(<[CharacterSummary]>::to_vec)
            .unwrap_or_default();

        Ok(CharacterPage {
            info: PageInfo {
                count: matching.len() as u32,
                pages,
                next: None,
                prev: None,
            },
            results,
        })
    }

    async fn fetch_character(&self, id: EntityId) -> Result<CharacterDetail, ApiError> {
        let (found, unreachable) = {
            let mut script = self.script.lock().unwrap();
            script.detail_requests.push(id);
            script.active_details += 1;
            script.peak_details = script.peak_details.max(script.active_details);
            (script.details.get(&id).cloned(), script.unreachable)
        };

        tokio::task::yield_now().await;
        let result = if unreachable {
            Err(transport_error().await)
        } else {
            found.ok_or(ApiError::NotFound {
                entity: "character",
                id,
            })
        };

        self.script.lock().unwrap().active_details -= 1;
        result
    }

    async fn fetch_location(&self, id: EntityId) -> Result<LocationDetail, ApiError> {
        let (found, unreachable) = {
            let script = self.script.lock().unwrap();
            (script.locations.get(&id).cloned(), script.unreachable)
        };
        if unreachable {
            return Err(transport_error().await);
        }
        found.ok_or(ApiError::NotFound {
            entity: "location",
            id,
        })
    }
}

pub fn memory_repository() -> CharacterRepository {
    CharacterRepository::new(Arc::new(MemoryCacheStore::new()))
}
