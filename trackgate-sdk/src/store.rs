use crate::event::LocationFix;
use async_trait::async_trait;
use trackgate_error::storage::StorageError;

/// Store capabilities required by the tracker communication plane.
///
/// The REST layer talks to the repositories directly; sessions and the
/// persistence worker only ever see this trait.
#[async_trait]
pub trait TrackerStore: Send + Sync {
    /// Whether the tracker is registered and enabled for ingestion.
    async fn is_tracker_enabled(&self, tracker_id: &str) -> Result<bool, StorageError>;

    async fn update_last_connected(
        &self,
        tracker_id: &str,
        timestamp: i64,
    ) -> Result<(), StorageError>;

    async fn insert_location(&self, fix: &LocationFix) -> Result<(), StorageError>;

    /// Base-64 encoded JT808 auth code, if one was minted for the tracker.
    async fn fetch_auth_code(&self, tracker_id: &str) -> Result<Option<String>, StorageError>;

    async fn save_auth_code(&self, tracker_id: &str, code_b64: &str) -> Result<(), StorageError>;

    async fn remove_auth_code(&self, tracker_id: &str) -> Result<(), StorageError>;
}
