//! Command router: fans control-plane commands in from the global
//! channel onto the right session queue.

use crate::registry::TrackerRegistry;
use std::sync::Arc;
use tokio::sync::mpsc;
use trackgate_sdk::TrackerCommand;
use tracing::debug;

pub async fn run_router(mut commands: mpsc::Receiver<TrackerCommand>, registry: Arc<TrackerRegistry>) {
    while let Some(cmd) = commands.recv().await {
        debug!(tracker = %cmd.tracker_id, payload = %cmd.payload, "routing command");
        registry.dispatch(cmd);
    }
    debug!("command channel closed, router exiting");
}
