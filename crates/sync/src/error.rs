use citadel_client::ApiError;
use citadel_core::error::CoreError;

/// Errors surfaced by the sync layer.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Remote fetch failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Local cache failure. Not expected in normal operation.
    #[error("Cache error: {0}")]
    Cache(#[from] sqlx::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SyncError {
    /// Offline with nothing cached for the requested record.
    pub fn is_no_data(&self) -> bool {
        matches!(self, SyncError::Core(CoreError::NoDataAvailable { .. }))
    }
}
