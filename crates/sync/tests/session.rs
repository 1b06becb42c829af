//! `CatalogSession` over a scripted remote and the in-memory cache.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use citadel_core::filter::{FilterDimension, FilterSelection};
use citadel_db::CharacterRepository;
use citadel_events::{kinds, EventBus};
use citadel_sync::{CatalogSession, LoadReport, StartReport};

use common::{detail, memory_repository, numbered, summary, FakeRemote};

fn build(remote: &FakeRemote, repository: &CharacterRepository) -> (CatalogSession, Arc<EventBus>) {
    let events = Arc::new(EventBus::default());
    let session = CatalogSession::new(
        Arc::new(remote.clone()),
        repository.clone(),
        events.clone(),
    );
    (session, events)
}

fn ids(characters: &[citadel_core::models::CharacterSummary]) -> Vec<i64> {
    characters.iter().map(|c| c.id).collect()
}

// ---------------------------------------------------------------------------
// Start
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_with_empty_cache_fetches_first_page() {
    let remote = FakeRemote::with_characters(numbered(7));
    let repository = memory_repository();
    let (session, _) = build(&remote, &repository);

    let report = session.start().await.unwrap();
    assert_matches!(
        report,
        StartReport::Fetched(LoadReport::Loaded { page: 1, count: 3, is_last_page: false })
    );

    assert_eq!(ids(&session.visible()), vec![1, 2, 3]);
    assert_eq!(ids(&repository.cached_characters().await.unwrap()), vec![1, 2, 3]);

    let cursor = session.cursor();
    assert_eq!(cursor.current_page, 2);
    assert_eq!(cursor.total_pages, Some(3));
    assert!(!session.is_loading());
}

#[tokio::test]
async fn start_with_cached_summaries_makes_no_request() {
    let remote = FakeRemote::with_characters(numbered(7));
    let repository = memory_repository();
    repository.cache_characters(&numbered(5)).await.unwrap();
    let (session, events) = build(&remote, &repository);
    let mut rx = events.subscribe();

    let report = session.start().await.unwrap();
    assert_eq!(report, StartReport::Restored { count: 5 });
    assert!(remote.page_requests().is_empty());
    assert_eq!(session.visible().len(), 5);

    let event = rx.recv().await.unwrap();
    assert_eq!(event.kind, kinds::CACHE_RESTORED);
    assert_eq!(event.payload["count"], 5);
}

#[tokio::test]
async fn first_fetch_after_restore_replaces_snapshot() {
    let remote = FakeRemote::with_characters(numbered(7));
    let repository = memory_repository();
    repository.cache_characters(&numbered(6)).await.unwrap();
    let (session, _) = build(&remote, &repository);

    session.start().await.unwrap();
    let report = session.load_next_characters().await.unwrap();

    assert_matches!(report, LoadReport::Loaded { page: 1, .. });
    assert_eq!(ids(&session.all_characters()), vec![1, 2, 3]);

    session.load_next_characters().await.unwrap();
    assert_eq!(ids(&session.all_characters()), vec![1, 2, 3, 4, 5, 6]);
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pages_append_in_order_until_exhausted() {
    let remote = FakeRemote::with_characters(numbered(7));
    let repository = memory_repository();
    let (session, events) = build(&remote, &repository);
    let mut rx = events.subscribe();

    assert_matches!(
        session.load_next_characters().await.unwrap(),
        LoadReport::Loaded { page: 1, .. }
    );
    assert_matches!(
        session.load_next_characters().await.unwrap(),
        LoadReport::Loaded { page: 2, .. }
    );
    assert_matches!(
        session.load_next_characters().await.unwrap(),
        LoadReport::Loaded { page: 3, count: 1, is_last_page: true }
    );
    assert_eq!(
        session.load_next_characters().await.unwrap(),
        LoadReport::Exhausted
    );

    assert_eq!(ids(&session.visible()), (1..=7).collect::<Vec<_>>());
    assert_eq!(remote.page_requests().len(), 3);
    assert_eq!(repository.cached_characters().await.unwrap().len(), 7);

    for page in 1..=3 {
        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind, kinds::PAGE_LOADED);
        assert_eq!(event.entity_id, Some(page));
    }
}

#[tokio::test]
async fn failed_page_is_reported_and_retried() {
    let remote = FakeRemote::with_characters(numbered(7));
    remote.fail_page(2);
    let repository = memory_repository();
    let (session, events) = build(&remote, &repository);
    let mut rx = events.subscribe();

    session.load_next_characters().await.unwrap();
    assert_eq!(
        session.load_next_characters().await.unwrap(),
        LoadReport::Failed { page: 2 }
    );
    assert_eq!(session.visible().len(), 3);
    assert_eq!(session.cursor().current_page, 2);
    assert!(!session.is_loading());

    remote.heal_page(2);
    assert_matches!(
        session.load_next_characters().await.unwrap(),
        LoadReport::Loaded { page: 2, .. }
    );
    assert_eq!(ids(&session.visible()), vec![1, 2, 3, 4, 5, 6]);

    let kinds_seen: Vec<String> = std::iter::from_fn(|| rx.try_recv().ok())
        .map(|e| e.kind)
        .collect();
    assert_eq!(
        kinds_seen,
        vec![kinds::PAGE_LOADED, kinds::PAGE_FAILED, kinds::PAGE_LOADED]
    );
}

#[tokio::test]
async fn failure_on_first_page_leaves_list_empty() {
    let remote = FakeRemote::with_characters(numbered(4));
    remote.fail_page(1);
    let repository = memory_repository();
    let (session, _) = build(&remote, &repository);

    let report = session.start().await.unwrap();
    assert_eq!(report, StartReport::Fetched(LoadReport::Failed { page: 1 }));
    assert!(session.visible().is_empty());
    assert_eq!(session.cursor().total_pages, None);
}

// ---------------------------------------------------------------------------
// Search and filters
// ---------------------------------------------------------------------------

fn family() -> Vec<citadel_core::models::CharacterSummary> {
    vec![
        summary(1, "Rick Sanchez", "Alive", "Human", "Male"),
        summary(2, "Morty Smith", "Alive", "Human", "Male"),
        summary(3, "Summer Smith", "Alive", "Human", "Female"),
        summary(4, "Beth Smith", "Alive", "Human", "Female"),
        summary(5, "Jerry Smith", "Alive", "Human", "Male"),
        summary(6, "Birdperson", "Dead", "Alien", "Male"),
    ]
}

#[tokio::test]
async fn search_query_narrows_visible_and_next_request() {
    let remote = FakeRemote::with_characters(family());
    let repository = memory_repository();
    let (session, _) = build(&remote, &repository);
    let mut query_rx = session.subscribe_query();

    session.load_next_characters().await.unwrap();
    session.set_search_query("SMITH");

    assert!(query_rx.has_changed().unwrap());
    assert_eq!(*query_rx.borrow_and_update(), "SMITH");
    assert_eq!(ids(&session.visible()), vec![2, 3]);
    assert_eq!(session.all_characters().len(), 3);

    session.load_next_characters().await.unwrap();
    let requests = remote.page_requests();
    assert_eq!(requests[1], (2, Some("SMITH".to_string())));
    assert_eq!(ids(&session.visible()), vec![2, 3, 5]);

    session.clear_search_query();
    assert_eq!(session.visible().len(), session.all_characters().len());
}

#[tokio::test]
async fn query_change_keeps_cursor_until_reset() {
    let remote = FakeRemote::with_characters(family());
    let repository = memory_repository();
    let (session, _) = build(&remote, &repository);

    session.load_next_characters().await.unwrap();
    session.set_search_query("smith");
    assert_eq!(session.cursor().current_page, 2);

    // Page 2 of the filtered result holds only Jerry; Beth sits on its page 1.
    session.load_next_characters().await.unwrap();
    assert!(!ids(&session.all_characters()).contains(&4));

    assert_matches!(
        session.reset_all().await.unwrap(),
        LoadReport::Loaded { page: 1, count: 3, is_last_page: false }
    );
    assert_eq!(remote.page_requests()[2], (1, Some("smith".to_string())));
    assert_eq!(ids(&session.visible()), vec![2, 3, 4]);
}

#[tokio::test]
async fn filters_recompute_visible_list() {
    let remote = FakeRemote::with_characters(family());
    let repository = memory_repository();
    let (session, _) = build(&remote, &repository);

    session.load_next_characters().await.unwrap();
    session.load_next_characters().await.unwrap();

    assert!(session.toggle_filter(FilterDimension::Gender, "Female"));
    assert_eq!(ids(&session.visible()), vec![3, 4]);

    assert!(!session.toggle_filter(FilterDimension::Gender, "Female"));
    assert_eq!(session.visible().len(), 6);

    session.update_filters(
        FilterSelection::new()
            .with(FilterDimension::Status, "Dead")
            .with(FilterDimension::Status, "Alive")
            .with(FilterDimension::Species, "Alien"),
    );
    assert_eq!(ids(&session.visible()), vec![6]);
    assert_eq!(
        session.subscribe_filters().borrow().species.len(),
        1
    );

    session.set_search_query("rick");
    assert!(session.visible().is_empty());

    session.clear_filters();
    assert_eq!(ids(&session.visible()), vec![1]);
}

#[tokio::test]
async fn visible_channel_sees_each_page() {
    let remote = FakeRemote::with_characters(numbered(5));
    let repository = memory_repository();
    let (session, _) = build(&remote, &repository);
    let mut visible_rx = session.subscribe_visible();

    session.load_next_characters().await.unwrap();
    assert!(visible_rx.has_changed().unwrap());
    assert_eq!(visible_rx.borrow_and_update().len(), 3);

    session.load_next_characters().await.unwrap();
    assert_eq!(visible_rx.borrow_and_update().len(), 5);
}

// ---------------------------------------------------------------------------
// Reset
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reset_clears_summaries_but_keeps_details() {
    let remote = FakeRemote::with_characters(numbered(7));
    let repository = memory_repository();
    repository.cache_character_detail(&detail(2, "Character 2")).await.unwrap();
    let (session, events) = build(&remote, &repository);

    session.load_next_characters().await.unwrap();
    session.load_next_characters().await.unwrap();
    assert_eq!(repository.cached_characters().await.unwrap().len(), 6);

    let mut rx = events.subscribe();
    let report = session.reset_all().await.unwrap();

    assert_matches!(report, LoadReport::Loaded { page: 1, count: 3, .. });
    assert_eq!(ids(&session.all_characters()), vec![1, 2, 3]);
    assert_eq!(ids(&repository.cached_characters().await.unwrap()), vec![1, 2, 3]);
    assert!(repository.cached_character_detail(2).await.unwrap().is_some());
    assert_eq!(session.cursor().current_page, 2);

    let cleared = rx.recv().await.unwrap();
    assert_eq!(cleared.kind, kinds::CACHE_CLEARED);
    assert_eq!(cleared.payload["removed"], 6);
}

#[tokio::test]
async fn reset_after_exhaustion_pages_again() {
    let remote = FakeRemote::with_characters(numbered(2));
    let repository = memory_repository();
    let (session, _) = build(&remote, &repository);

    session.load_next_characters().await.unwrap();
    assert_eq!(
        session.load_next_characters().await.unwrap(),
        LoadReport::Exhausted
    );

    assert_matches!(
        session.reset_all().await.unwrap(),
        LoadReport::Loaded { page: 1, count: 2, is_last_page: true }
    );
    assert_eq!(remote.page_requests().len(), 2);
}
