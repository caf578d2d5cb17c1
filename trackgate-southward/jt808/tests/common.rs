use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use trackgate_error::storage::StorageError;
use trackgate_sdk::{LocationFix, SessionContext, TrackerStore};

/// In-memory store with working auth-code persistence, enough to drive
/// the registration/authentication handshake.
#[derive(Default)]
pub struct MemStore {
    pub codes: Mutex<HashMap<String, String>>,
    /// When set, `save_auth_code` fails as if the tracker were not
    /// provisioned.
    pub reject_saves: bool,
}

#[async_trait::async_trait]
impl TrackerStore for MemStore {
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

    async fn fetch_auth_code(&self, tracker_id: &str) -> Result<Option<String>, StorageError> {
        Ok(self.codes.lock().unwrap().get(tracker_id).cloned())
    }

    async fn save_auth_code(&self, tracker_id: &str, code: &str) -> Result<(), StorageError> {
        if self.reject_saves {
            return Err(StorageError::EntityNotFound(tracker_id.to_string()));
        }
        self.codes
            .lock()
            .unwrap()
            .insert(tracker_id.to_string(), code.to_string());
        Ok(())
    }

    async fn remove_auth_code(&self, tracker_id: &str) -> Result<(), StorageError> {
        self.codes.lock().unwrap().remove(tracker_id);
        Ok(())
    }
}

pub fn test_context() -> (Arc<MemStore>, SessionContext, mpsc::Receiver<LocationFix>) {
    let store = Arc::new(MemStore::default());
    let (tx, rx) = mpsc::channel(16);
    (
        store.clone(),
        SessionContext {
            store,
            events: tx,
        },
        rx,
    )
}
