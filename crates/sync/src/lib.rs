//! Paginated synchronization of the character catalog.
//!
//! - [`paginator`] is the incremental page-fetch state machine.
//! - [`session::CatalogSession`] owns the accumulated list, the search and
//!   filter inputs, and the derived visible list.
//! - [`detail::DetailService`] serves character and location records from
//!   the network or the cache depending on connectivity.

pub mod detail;
pub mod error;
pub mod paginator;
pub mod session;

pub use detail::{DataSource, DetailService, ResidentPreview, Served, RESIDENT_CONCURRENCY};
pub use error::SyncError;
pub use paginator::{Cursor, FetchedPage, LoadOutcome, PageLoad, PageSource, Paginator};
pub use session::{CatalogSession, LoadReport, StartReport};
