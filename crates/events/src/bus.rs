//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] fans [`CatalogEvent`]s out to every subscriber. Share it via
//! `Arc<EventBus>`.

use chrono::{DateTime, Utc};
use citadel_core::types::EntityId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

/// Dot-separated event names published by the sync layer.
pub mod kinds {
    /// A list page was fetched and appended. Entity id is the page number.
    pub const PAGE_LOADED: &str = "page.loaded";
    /// A list page fetch failed; the cursor did not move.
    pub const PAGE_FAILED: &str = "page.failed";
    /// The session started from cached summaries.
    pub const CACHE_RESTORED: &str = "cache.restored";
    /// Cached summaries were purged by a reset.
    pub const CACHE_CLEARED: &str = "cache.cleared";
    /// A character detail was served. Payload carries the source.
    pub const DETAIL_SERVED: &str = "detail.served";
    /// A location was served. Payload carries the source.
    pub const LOCATION_SERVED: &str = "location.served";
}

// ---------------------------------------------------------------------------
// CatalogEvent
// ---------------------------------------------------------------------------

/// Something that happened while syncing the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEvent {
    /// One of the names in [`kinds`].
    pub kind: String,

    /// Record id or page number the event is about, when there is one.
    pub entity_id: Option<EntityId>,

    /// Event-specific data.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl CatalogEvent {
    /// Create an event with no entity and an empty payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            entity_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_entity(mut self, id: EntityId) -> Self {
        self.entity_id = Some(id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// ```rust
/// use citadel_events::bus::{kinds, CatalogEvent, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(CatalogEvent::new(kinds::CACHE_CLEARED));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<CatalogEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// Slow receivers that fall more than `capacity` events behind observe
    /// `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: CatalogEvent) {
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
