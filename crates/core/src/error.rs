use crate::types::EntityId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Offline and nothing cached for the requested record.
    #[error("No data available for {entity} {id}: no cached copy and no network")]
    NoDataAvailable { entity: &'static str, id: EntityId },
}
