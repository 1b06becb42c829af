//! Catalog event bus.
//!
//! - [`EventBus`] is an in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`CatalogEvent`] is the event envelope; [`kinds`] lists the event names
//!   the sync layer emits.

pub mod bus;

pub use bus::{kinds, CatalogEvent, EventBus};
