//! Foreign ids encoded as the trailing path segment of a resource URL.
//!
//! The API links records only through URLs such as
//! `https://rickandmortyapi.com/api/location/3`. Anything that does not end
//! in a plain decimal segment is treated as not navigable.

use crate::types::EntityId;

/// Parse the trailing path segment of `url` as an id.
///
/// Query strings, fragments and a single trailing slash are ignored.
/// Returns `None` for empty input and for non-numeric or signed segments.
///
/// ```
/// use citadel_core::refs::ref_id;
///
/// assert_eq!(ref_id("https://rickandmortyapi.com/api/location/3"), Some(3));
/// assert_eq!(ref_id("https://rickandmortyapi.com/api/location/"), None);
/// assert_eq!(ref_id(""), None);
/// ```
pub fn ref_id(url: &str) -> Option<EntityId> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let path = path.strip_suffix('/').unwrap_or(path);
    let segment = path.rsplit('/').next()?;

    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Display label for an episode link: its number when present, else the URL.
pub fn episode_label(url: &str) -> String {
    match ref_id(url) {
        Some(number) => number.to_string(),
        None => url.to_string(),
    }
}
