//! The catalog list session.
//!
//! [`CatalogSession`] owns everything the list screen observes: the
//! accumulated character list, the search query, the filter selection and
//! the visible list derived from them. Each mutating call re-derives the
//! visible list and publishes it on a `watch` channel.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use citadel_client::{ApiError, RemoteSource};
use citadel_core::filter::{self, FilterDimension, FilterSelection};
use citadel_core::models::CharacterSummary;
use citadel_core::types::PageNumber;
use citadel_db::CharacterRepository;
use citadel_events::{kinds, CatalogEvent, EventBus};
use tokio::sync::watch;

use crate::error::SyncError;
use crate::paginator::{Cursor, FetchedPage, LoadOutcome, PageSource, Paginator};

// ---------------------------------------------------------------------------
// Page source
// ---------------------------------------------------------------------------

/// Fetches list pages using the session's current search query as the
/// server-side `name` parameter.
///
/// The query is read per request and the cursor is not rewound when it
/// changes. After a query change the next page is fetched at the old page
/// number of the newly filtered result, so matches on its earlier pages are
/// skipped until [`CatalogSession::reset_all`].
pub struct CharacterPageSource {
    remote: Arc<dyn RemoteSource>,
    query: watch::Receiver<String>,
}

#[async_trait]
impl PageSource for CharacterPageSource {
    type Item = CharacterSummary;
    type Error = ApiError;

    async fn fetch_page(
        &self,
        page: PageNumber,
    ) -> Result<FetchedPage<CharacterSummary>, ApiError> {
        let name = self.query.borrow().clone();
        let response = self
            .remote
            .fetch_character_page(page, None, Some(&name))
            .await?;
        Ok(FetchedPage {
            total_pages: response.info.pages,
            items: response.results,
        })
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// What [`CatalogSession::load_next_characters`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    Loaded {
        page: PageNumber,
        count: usize,
        is_last_page: bool,
    },
    /// A load was already running.
    InFlight,
    /// Every page has been loaded.
    Exhausted,
    /// The fetch failed and was logged; calling again retries `page`.
    Failed { page: PageNumber },
}

/// How [`CatalogSession::start`] populated the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartReport {
    /// The cache held `count` summaries; no request was made.
    Restored { count: usize },
    /// The cache was empty and the first page was requested.
    Fetched(LoadReport),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

struct SessionState {
    all: Vec<CharacterSummary>,
    query: String,
    filters: FilterSelection,
    /// `all` is a cache snapshot with no cursor behind it; the next fetched
    /// page replaces it instead of appending.
    restored_from_cache: bool,
}

/// One browsing session over the catalog list.
pub struct CatalogSession {
    repository: CharacterRepository,
    events: Arc<EventBus>,
    paginator: Paginator<CharacterPageSource>,
    state: Mutex<SessionState>,
    visible_tx: watch::Sender<Vec<CharacterSummary>>,
    query_tx: watch::Sender<String>,
    filters_tx: watch::Sender<FilterSelection>,
}

impl CatalogSession {
    pub fn new(
        remote: Arc<dyn RemoteSource>,
        repository: CharacterRepository,
        events: Arc<EventBus>,
    ) -> Self {
        let (visible_tx, _) = watch::channel(Vec::new());
        let (query_tx, query_rx) = watch::channel(String::new());
        let (filters_tx, _) = watch::channel(FilterSelection::default());

        let paginator = Paginator::new(CharacterPageSource {
            remote,
            query: query_rx,
        });

        Self {
            repository,
            events,
            paginator,
            state: Mutex::new(SessionState {
                all: Vec::new(),
                query: String::new(),
                filters: FilterSelection::default(),
                restored_from_cache: false,
            }),
            visible_tx,
            query_tx,
            filters_tx,
        }
    }

    // ---- observables ----

    pub fn subscribe_visible(&self) -> watch::Receiver<Vec<CharacterSummary>> {
        self.visible_tx.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.paginator.subscribe_loading()
    }

    pub fn subscribe_query(&self) -> watch::Receiver<String> {
        self.query_tx.subscribe()
    }

    pub fn subscribe_filters(&self) -> watch::Receiver<FilterSelection> {
        self.filters_tx.subscribe()
    }

    /// Current visible list.
    pub fn visible(&self) -> Vec<CharacterSummary> {
        self.visible_tx.borrow().clone()
    }

    /// Current accumulated list, before search and filters.
    pub fn all_characters(&self) -> Vec<CharacterSummary> {
        self.lock_state().all.clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.paginator.subscribe_loading().borrow()
    }

    pub fn cursor(&self) -> Cursor {
        self.paginator.cursor()
    }

    // ---- entry points ----

    /// Restore the list from the cache, or fetch the first page when the
    /// cache is empty.
    pub async fn start(&self) -> Result<StartReport, SyncError> {
        let cached = self.repository.cached_characters().await?;
        if cached.is_empty() {
            return Ok(StartReport::Fetched(self.load_next_characters().await?));
        }

        let count = cached.len();
        {
            let mut state = self.lock_state();
            state.all = cached;
            state.restored_from_cache = true;
            self.publish_visible(&state);
        }

        tracing::info!(count, "Restored characters from cache");
        self.events.publish(
            CatalogEvent::new(kinds::CACHE_RESTORED)
                .with_payload(serde_json::json!({ "count": count })),
        );
        Ok(StartReport::Restored { count })
    }

    /// Fetch the next page, append it and cache it.
    ///
    /// Fetch failures are logged and reported, never returned as errors; the
    /// next call retries the same page. Cache write failures are returned.
    pub async fn load_next_characters(&self) -> Result<LoadReport, SyncError> {
        match self.paginator.load_next_page().await {
            LoadOutcome::Loaded(mut load) => {
                let page = load.page();
                let is_last_page = load.is_last_page();
                let items = load.take_items();
                let count = items.len();

                self.append_page(&items);
                let cached = self.repository.cache_characters(&items).await;
                drop(load);
                cached?;

                self.events.publish(
                    CatalogEvent::new(kinds::PAGE_LOADED)
                        .with_entity(i64::from(page))
                        .with_payload(serde_json::json!({
                            "count": count,
                            "is_last_page": is_last_page,
                        })),
                );
                Ok(LoadReport::Loaded {
                    page,
                    count,
                    is_last_page,
                })
            }
            LoadOutcome::InFlight => Ok(LoadReport::InFlight),
            LoadOutcome::Exhausted => Ok(LoadReport::Exhausted),
            LoadOutcome::Failed { page, error } => {
                self.events.publish(
                    CatalogEvent::new(kinds::PAGE_FAILED)
                        .with_entity(i64::from(page))
                        .with_payload(serde_json::json!({ "error": error.to_string() })),
                );
                Ok(LoadReport::Failed { page })
            }
        }
    }

    /// Pull-to-refresh: rewind the cursor, drop the list and the cached
    /// summaries, then fetch page 1.
    ///
    /// Detail and location caches are left alone. Await any running
    /// [`load_next_characters`](Self::load_next_characters) first.
    pub async fn reset_all(&self) -> Result<LoadReport, SyncError> {
        self.paginator.reset();
        {
            let mut state = self.lock_state();
            state.all.clear();
            state.restored_from_cache = false;
            self.publish_visible(&state);
        }

        let removed = self.repository.clear_cache().await?;
        tracing::info!(removed, "Cleared cached characters");
        self.events.publish(
            CatalogEvent::new(kinds::CACHE_CLEARED)
                .with_payload(serde_json::json!({ "removed": removed })),
        );

        self.load_next_characters().await
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        let mut state = self.lock_state();
        state.query = query.clone();
        self.query_tx.send_replace(query);
        self.publish_visible(&state);
    }

    pub fn clear_search_query(&self) {
        self.set_search_query(String::new());
    }

    pub fn update_filters(&self, filters: FilterSelection) {
        let mut state = self.lock_state();
        state.filters = filters.clone();
        self.filters_tx.send_replace(filters);
        self.publish_visible(&state);
    }

    /// Flip one filter value. Returns whether it is selected afterwards.
    pub fn toggle_filter(&self, dimension: FilterDimension, value: &str) -> bool {
        let mut state = self.lock_state();
        let selected = state.filters.toggle(dimension, value);
        self.filters_tx.send_replace(state.filters.clone());
        self.publish_visible(&state);
        selected
    }

    pub fn clear_filters(&self) {
        self.update_filters(FilterSelection::default());
    }

    // ---- private helpers ----

    fn append_page(&self, items: &[CharacterSummary]) {
        let mut state = self.lock_state();
        if state.restored_from_cache {
            tracing::debug!(
                restored = state.all.len(),
                "Replacing cache snapshot with fetched page",
            );
            state.all.clear();
            state.restored_from_cache = false;
        }
        state.all.extend_from_slice(items);
        self.publish_visible(&state);
    }

    fn publish_visible(&self, state: &SessionState) {
        let visible = filter::visible(&state.all, &state.query, &state.filters);
        self.visible_tx.send_replace(visible);
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
