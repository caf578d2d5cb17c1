use std::sync::Arc;
use tokio::sync::mpsc;
use trackgate_error::storage::StorageError;
use trackgate_sdk::{LocationFix, SessionContext, TrackerStore};

/// Store stub for protocol tests: every tracker is enabled, nothing is
/// persisted.
pub struct NullStore;

#[async_trait::async_trait]
impl TrackerStore for NullStore {
    async fn is_tracker_enabled(&self, _tracker_id: &str) -> Result<bool, StorageError> {
        Ok(true)
    }

    async fn update_last_connected(
        &self,
        _tracker_id: &str,
        _timestamp: i64,
    ) -> Result<(), StorageError> {
        Ok(())
    }

    async fn insert_location(&self, _fix: &LocationFix) -> Result<(), StorageError> {
        Ok(())
    }

    async fn fetch_auth_code(&self, _tracker_id: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn save_auth_code(&self, _tracker_id: &str, _code: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn remove_auth_code(&self, _tracker_id: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

pub fn test_context() -> (SessionContext, mpsc::Receiver<LocationFix>) {
    let (tx, rx) = mpsc::channel(16);
    (
        SessionContext {
            store: Arc::new(NullStore),
            events: tx,
        },
        rx,
    )
}
