use crate::{AuthCodeRepository, LocationRepository, TrackerRepository};
use async_trait::async_trait;
use trackgate_error::storage::StorageError;
use trackgate_sdk::{LocationFix, TrackerStore};

/// [`TrackerStore`] backed by the SQL repositories; the one the real
/// gateway runs with.
#[derive(Debug, Default, Clone, Copy)]
pub struct DbTrackerStore;

#[async_trait]
impl TrackerStore for DbTrackerStore {
    async fn is_tracker_enabled(&self, tracker_id: &str) -> Result<bool, StorageError> {
        TrackerRepository::is_enabled(tracker_id).await
    }

    async fn update_last_connected(
        &self,
        tracker_id: &str,
        timestamp: i64,
    ) -> Result<(), StorageError> {
        TrackerRepository::update_last_connected(tracker_id, timestamp).await
    }

    async fn insert_location(&self, fix: &LocationFix) -> Result<(), StorageError> {
        LocationRepository::insert(fix).await
    }

    async fn fetch_auth_code(&self, tracker_id: &str) -> Result<Option<String>, StorageError> {
        AuthCodeRepository::fetch(tracker_id).await
    }

    async fn save_auth_code(&self, tracker_id: &str, code_b64: &str) -> Result<(), StorageError> {
        AuthCodeRepository::save(tracker_id, code_b64).await
    }

    async fn remove_auth_code(&self, tracker_id: &str) -> Result<(), StorageError> {
        AuthCodeRepository::remove(tracker_id).await
    }
}
