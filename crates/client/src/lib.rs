//! Remote catalog access and network reachability.
//!
//! - [`api::CatalogApi`] wraps the catalog's JSON endpoints with [`reqwest`].
//! - [`source::RemoteSource`] is the seam the sync layer fetches through.
//! - [`connectivity`] answers whether a usable network transport is up.

pub mod api;
pub mod connectivity;
pub mod source;

pub use api::{ApiError, CatalogApi, PageFilters, DEFAULT_API_URL};
pub use connectivity::{has_connectivity, ConnectivityProbe, FixedProbe, SysfsProbe, Transport};
pub use source::RemoteSource;
