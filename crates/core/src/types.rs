/// Record ids are assigned by the remote catalog and stable across fetches.
pub type EntityId = i64;

/// Page numbers are 1-based.
pub type PageNumber = u32;
