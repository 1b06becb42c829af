//! Flattening of list-valued fields for single-column storage.
//!
//! Episode and resident URLs are persisted as one comma-joined string.
//! Items must not themselves contain a comma.

pub const LIST_DELIMITER: char = ',';

/// Join `items` into a single delimited string. An empty list encodes to `""`.
pub fn encode_list(items: &[String]) -> String {
    items.join(&LIST_DELIMITER.to_string())
}

/// Split a stored string back into its items.
///
/// A blank string decodes to an empty list, never to `[""]`.
pub fn decode_list(stored: &str) -> Vec<String> {
    if stored.trim().is_empty() {
        return Vec::new();
    }
    stored.split(LIST_DELIMITER).map(str::to_string).collect()
}
