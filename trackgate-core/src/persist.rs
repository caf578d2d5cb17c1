//! Persistence worker: drains the event channel into the store.

use std::sync::Arc;
use tokio::sync::mpsc;
use trackgate_sdk::{LocationFix, TrackerStore};
use tracing::{debug, error, info};

/// Drain location events until every sender is gone. Events without a
/// position fix are skipped, not fatal; store errors cost the one
/// record.
pub async fn run_persister(mut events: mpsc::Receiver<LocationFix>, store: Arc<dyn TrackerStore>) {
    while let Some(fix) = events.recv().await {
        if !fix.has_position() {
            debug!(tracker = %fix.tracker_id, "skipping event with empty coordinates");
            continue;
        }
        if let Some(alarm) = fix.alarm {
            info!(tracker = %fix.tracker_id, alarm, "persisting alarm event");
        }
        if let Err(e) = store.insert_location(&fix).await {
            error!(tracker = %fix.tracker_id, error = %e, "failed to persist location");
        }
    }
    debug!("event channel closed, persister exiting");
}
