use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use trackgate_error::storage::StorageError;
use trackgate_sdk::{LocationFix, SessionContext, TrackerStore};

/// Configurable in-memory store for dispatch tests.
#[derive(Default)]
pub struct StubStore {
    /// Tracker ids considered registered and enabled.
    pub enabled: Mutex<Vec<String>>,
    pub codes: Mutex<HashMap<String, String>>,
    pub last_connected: Mutex<HashMap<String, i64>>,
}

impl StubStore {
    pub fn with_enabled(ids: &[&str]) -> Arc<Self> {
        let store = Self::default();
        *store.enabled.lock().unwrap() = ids.iter().map(|s| s.to_string()).collect();
        Arc::new(store)
    }
}

#[async_trait::async_trait]
impl TrackerStore for StubStore {
    async fn is_tracker_enabled(&self, tracker_id: &str) -> Result<bool, StorageError> {
        Ok(self
            .enabled
            .lock()
            .unwrap()
            .iter()
            .any(|id| id == tracker_id))
    }

    async fn update_last_connected(
        &self,
        tracker_id: &str,
        timestamp: i64,
    ) -> Result<(), StorageError> {
        self.last_connected
            .lock()
            .unwrap()
            .insert(tracker_id.to_string(), timestamp);
        Ok(())
    }

    async fn insert_location(&self, _fix: &LocationFix) -> Result<(), StorageError> {
        Ok(())
    }

    async fn fetch_auth_code(&self, tracker_id: &str) -> Result<Option<String>, StorageError> {
        Ok(self.codes.lock().unwrap().get(tracker_id).cloned())
    }

    async fn save_auth_code(&self, tracker_id: &str, code: &str) -> Result<(), StorageError> {
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

pub fn context_with(store: Arc<StubStore>) -> (SessionContext, mpsc::Receiver<LocationFix>) {
    let (tx, rx) = mpsc::channel(16);
    (
        SessionContext {
            store,
            events: tx,
        },
        rx,
    )
}
